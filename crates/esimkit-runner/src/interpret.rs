//! Simulator output scanning.
//!
//! This is a best-effort text heuristic, not a parser of ngspice's output
//! format. Any line containing a marker word is surfaced for a human to
//! read; a line that merely mentions "error" (say, "0 errors") is reported
//! too, and a failure worded without a marker is missed.

use serde::Serialize;

/// Substrings that mark a run as unusable even when the exit code is 0.
pub const FATAL_MARKERS: [&str; 3] = ["fatal", "singular matrix", "timestep too small"];

const ERROR_MARKER: &str = "error";
const WARNING_MARKER: &str = "warning";

/// Lines of interest pulled out of simulator output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputSummary {
    /// Lines containing "error" or a fatal marker, trimmed.
    pub errors: Vec<String>,
    /// Lines containing "warning" and no error marker, trimmed.
    pub warnings: Vec<String>,
    /// Whether any fatal marker was seen.
    pub fatal: bool,
}

/// Scan `output` line by line, case-insensitively.
pub fn interpret(output: &str) -> OutputSummary {
    let mut summary = OutputSummary::default();

    for line in output.lines() {
        let lower = line.to_lowercase();
        let fatal = FATAL_MARKERS.iter().any(|m| lower.contains(m));

        if fatal || lower.contains(ERROR_MARKER) {
            summary.fatal |= fatal;
            summary.errors.push(line.trim().to_string());
        } else if lower.contains(WARNING_MARKER) {
            summary.warnings.push(line.trim().to_string());
        }
    }

    summary
}

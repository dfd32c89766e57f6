//! Result and status types for simulator runs.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::Error;
use crate::interpret::interpret;

/// How a simulator run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimulationStatus {
    /// Exit code 0 and no fatal marker in the output.
    Completed,
    /// Non-zero exit, fatal marker, or the run could not start.
    Failed,
    /// Killed after exceeding the configured timeout.
    TimedOut,
}

/// Outcome of one simulator invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationResult {
    pub succeeded: bool,
    pub exit_status: SimulationStatus,
    /// Process exit code, when the process exited on its own.
    pub exit_code: Option<i32>,
    /// Captured stdout followed by stderr.
    pub raw_output: String,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Wall-clock time of the run in milliseconds.
    pub elapsed_ms: u64,
}

impl SimulationResult {
    /// Build the failed or timed-out result for a run that could not
    /// complete normally.
    pub fn from_error(error: &Error) -> Self {
        match error {
            Error::Timeout {
                output, elapsed_ms, ..
            } => {
                let summary = interpret(output);
                let mut errors = summary.errors;
                errors.push(error.to_string());
                Self {
                    succeeded: false,
                    exit_status: SimulationStatus::TimedOut,
                    exit_code: None,
                    raw_output: output.clone(),
                    errors,
                    warnings: summary.warnings,
                    elapsed_ms: *elapsed_ms,
                }
            }
            _ => Self {
                succeeded: false,
                exit_status: SimulationStatus::Failed,
                exit_code: None,
                raw_output: String::new(),
                errors: vec![error.to_string()],
                warnings: Vec::new(),
                elapsed_ms: 0,
            },
        }
    }
}

/// Simulator availability, as reported by [`crate::Simulator::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulatorStatus {
    /// Configured eSim installation directory.
    pub installation_path: Option<PathBuf>,
    pub installation_found: bool,
    /// Resolved simulator executable.
    pub executable: Option<PathBuf>,
    pub available: bool,
    /// Runs started through this simulator handle.
    pub simulations_run: usize,
}

//! Error types for esimkit-netlist.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read netlist {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("netlist contains no usable lines")]
    EmptyCircuit,
}

pub type Result<T> = std::result::Result<T, Error>;

/// A line that could not be turned into a component.
///
/// Malformed lines are skipped and reported alongside the parse result; they
/// never abort a parse.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MalformedLine {
    /// 1-based line number in the source text.
    pub line: usize,
    /// The offending text, trimmed.
    pub text: String,
    /// Why the line was rejected.
    pub reason: String,
}

impl std::fmt::Display for MalformedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {} ({})", self.line, self.reason, self.text)
    }
}

//! Error types for the simulation runner.
//!
//! These never reach callers of [`crate::Simulator::simulate`]; they are
//! folded into a failed or timed-out [`crate::SimulationResult`].

use std::path::PathBuf;

use thiserror::Error;

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running the simulator.
#[derive(Debug, Error)]
pub enum Error {
    /// Simulator executable not found.
    #[error("simulator not available: {0} not found. Install ngspice (e.g. `apt install ngspice`) or set esim.ngspice_path")]
    ToolNotAvailable(String),

    /// Netlist file does not exist.
    #[error("netlist file not found: {}", .0.display())]
    NetlistNotFound(PathBuf),

    /// Process could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exceeded its wall-clock limit and was killed.
    #[error("simulation timed out after {secs} seconds")]
    Timeout {
        secs: u64,
        /// Wall-clock time until the process was killed.
        elapsed_ms: u64,
        /// Output captured before the process was killed.
        output: String,
    },

    /// `--version` did not produce a version line.
    #[error("could not determine simulator version: {0}")]
    VersionUnavailable(String),

    /// Temp file error.
    #[error("temp file error: {0}")]
    TempFile(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

//! Simulator invocation for esimkit.
//!
//! This crate provides infrastructure for:
//! - Locating the ngspice executable (configured path or PATH search)
//! - Running a netlist through it with a hard wall-clock timeout
//! - Scanning the captured output for error and warning lines
//!
//! Every failure mode of a run (missing tool, missing netlist, non-zero
//! exit, timeout) is reported as a [`SimulationResult`] rather than an error.

pub mod error;
pub mod interpret;
pub mod locate;
pub mod runner;
pub mod types;

pub use error::{Error, Result};
pub use interpret::{FATAL_MARKERS, OutputSummary, interpret};
pub use locate::{locate_executable, search_path};
pub use runner::{Simulator, SimulatorConfig};
pub use types::{SimulationResult, SimulationStatus, SimulatorStatus};

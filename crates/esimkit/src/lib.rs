//! # esimkit
//!
//! SPICE netlist analysis and ngspice integration.
//!
//! esimkit provides:
//! - Netlist parsing, component classification and topology validation
//! - Layered configuration (defaults, YAML file, `ESIM_*` environment, runtime)
//! - Simulator invocation with a hard timeout and output scanning
//!
//! ## Quick Start
//!
//! ```rust
//! use esimkit::prelude::*;
//!
//! let parsed = esimkit::parse("Voltage Divider\nV1 1 0 DC 10\nR1 1 2 1k\nR2 2 0 1k\n.op\n.end\n").unwrap();
//! let report = parsed.model.validate();
//! assert!(report.is_valid);
//! ```
//!
//! ## Running Simulations
//!
//! ```rust,no_run
//! use esimkit::prelude::*;
//!
//! let config = Config::new();
//! let mut simulator = Simulator::new(SimulatorConfig::from_config(&config));
//! let result = simulator.simulate("circuits/voltage_divider.cir".as_ref());
//! if !result.succeeded {
//!     for line in &result.errors {
//!         eprintln!("{}", line);
//!     }
//! }
//! ```

mod session;

pub use esimkit_config as config;
pub use esimkit_netlist as netlist;
pub use esimkit_runner as runner;

pub use session::{CircuitReport, Session};

// ============================================================================
// Convenient re-exports from esimkit_netlist
// ============================================================================

pub use esimkit_netlist::{
    CircuitAnalysis, CircuitModel, Component, ComponentKind, Directive, Error as NetlistError,
    MalformedLine, ParsedNetlist, ValidationReport, parse, parse_file,
};

// ============================================================================
// Convenient re-exports from esimkit_config
// ============================================================================

pub use esimkit_config::{Config, Error as ConfigError, Layer, Settings};

// ============================================================================
// Convenient re-exports from esimkit_runner
// ============================================================================

pub use esimkit_runner::{
    Error as RunnerError, SimulationResult, SimulationStatus, Simulator, SimulatorConfig,
    SimulatorStatus,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        CircuitModel, ComponentKind, Config, ParsedNetlist, Session, SimulationResult,
        SimulationStatus, Simulator, SimulatorConfig, ValidationReport,
    };
}

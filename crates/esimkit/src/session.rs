//! Configuration-aware entry point tying parsing, validation and
//! simulation together.

use std::path::Path;

use esimkit_config::Config;
use esimkit_netlist::{
    CircuitAnalysis, DEFAULT_GROUND, Directive, MalformedLine, ParsedNetlist, ValidationReport,
};
use esimkit_runner::{SimulationResult, Simulator, SimulatorConfig, SimulatorStatus};
use serde::Serialize;

/// Analysis and validation of one netlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CircuitReport {
    pub analysis: CircuitAnalysis,
    pub validation: ValidationReport,
    pub directives: Vec<Directive>,
    pub warnings: Vec<MalformedLine>,
}

/// A configuration plus a simulator built from it.
#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    simulator: Simulator,
}

impl Session {
    /// Mistyped simulator keys fall back to their defaults, so a bad
    /// `ESIM_TIMEOUT` never blocks analysis.
    pub fn new(config: Config) -> Self {
        let simulator = Simulator::new(SimulatorConfig::from_config(&config));
        Self { config, simulator }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn simulator(&self) -> &Simulator {
        &self.simulator
    }

    /// Ground node from `circuit.default_ground`, `"0"` if unset or not a
    /// string.
    pub fn ground(&self) -> String {
        match self.config.get_as::<String>("circuit.default_ground") {
            Ok(Some(ground)) => ground,
            Ok(None) => DEFAULT_GROUND.to_string(),
            Err(e) => {
                log::warn!("ignoring circuit.default_ground: {}", e);
                DEFAULT_GROUND.to_string()
            }
        }
    }

    /// Parse and validate netlist text.
    pub fn analyze_text(&self, netlist: &str) -> esimkit_netlist::Result<CircuitReport> {
        Ok(self.report(esimkit_netlist::parse(netlist)?))
    }

    /// Parse and validate a netlist file.
    pub fn analyze_file(&self, path: &Path) -> esimkit_netlist::Result<CircuitReport> {
        Ok(self.report(esimkit_netlist::parse_file(path)?))
    }

    /// Run the simulator on a netlist file.
    pub fn simulate_file(&mut self, path: &Path) -> SimulationResult {
        self.simulator.simulate(path)
    }

    pub fn simulator_status(&self) -> SimulatorStatus {
        self.simulator.status()
    }

    fn report(&self, parsed: ParsedNetlist) -> CircuitReport {
        let validation = parsed.model.validate_with_ground(&self.ground());
        CircuitReport {
            analysis: parsed.model.analyze(),
            validation,
            directives: parsed.directives,
            warnings: parsed.warnings,
        }
    }
}

//! Typed view of the configuration tree.
//!
//! Every known key is an optional field so a partial tree deserializes
//! cleanly; unknown keys are kept in the flattened `extra` maps.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

/// Settings for locating and driving the simulator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EsimSettings {
    /// eSim installation directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_path: Option<PathBuf>,
    /// ngspice executable: a path, or a bare name looked up on PATH.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ngspice_path: Option<PathBuf>,
    /// Wall-clock limit for one simulation, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Arguments placed before the netlist path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Settings for simulation output handling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keep_intermediate_files: Option<bool>,
    /// `quiet`, `normal` or `verbose`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Defaults applied to circuits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitSettings {
    /// Reference node name used by validation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ground: Option<String>,
    /// Temperature in degrees Celsius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_precision: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// The whole configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub esim: EsimSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
    #[serde(default)]
    pub circuit: CircuitSettings,
    /// Sections this crate does not know about.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Settings {
    /// Built-in defaults, the lowest configuration layer.
    pub fn builtin() -> Self {
        Self {
            esim: EsimSettings {
                installation_path: Some(PathBuf::from("/usr/share/esim")),
                ngspice_path: Some(PathBuf::from("/usr/bin/ngspice")),
                timeout: Some(30),
                args: Some(vec!["-b".to_string()]),
                extra: BTreeMap::new(),
            },
            simulation: SimulationSettings {
                output_dir: Some(PathBuf::from("./simulation_results")),
                keep_intermediate_files: Some(false),
                verbosity: Some("normal".to_string()),
                extra: BTreeMap::new(),
            },
            circuit: CircuitSettings {
                default_ground: Some("0".to_string()),
                default_temp: Some(27.0),
                default_precision: Some(1e-6),
                extra: BTreeMap::new(),
            },
            extra: BTreeMap::new(),
        }
    }

    /// Serializable tree form, as used by dotted-path lookups.
    pub fn to_value(&self) -> Value {
        // Plain data with string keys always serializes.
        serde_yaml::to_value(self).unwrap_or(Value::Null)
    }
}

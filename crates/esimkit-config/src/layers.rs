//! Layered configuration store.
//!
//! A [`Config`] is an ordered list of [`Layer`]s, lowest precedence first.
//! Lookups walk the list from the top and return the first layer that
//! resolves the whole dotted path. The usual stack is
//! defaults → file → environment → runtime.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

use crate::env::EnvOverrides;
use crate::error::{Error, Result};
use crate::path;
use crate::settings::{CircuitSettings, EsimSettings, Settings, SimulationSettings};

/// One source of configuration values.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    /// Built-in values.
    Defaults(Value),
    /// Values read from a YAML file.
    File { path: PathBuf, values: Value },
    /// `ESIM_*` variables.
    Environment(EnvOverrides),
    /// Values written through [`Config::set`].
    Runtime(Value),
}

impl Layer {
    /// Built-in defaults from [`Settings::builtin`].
    pub fn builtin_defaults() -> Self {
        Layer::Defaults(Settings::builtin().to_value())
    }

    /// Empty runtime layer.
    pub fn runtime() -> Self {
        Layer::Runtime(Value::Mapping(Mapping::new()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Layer::Defaults(_) => "defaults",
            Layer::File { .. } => "file",
            Layer::Environment(_) => "environment",
            Layer::Runtime(_) => "runtime",
        }
    }

    fn lookup(&self, dotted: &str, segments: &[&str]) -> Option<Value> {
        match self {
            Layer::Defaults(values) | Layer::File { values, .. } | Layer::Runtime(values) => {
                path::lookup(values, segments).cloned()
            }
            Layer::Environment(env) => env.lookup(dotted),
        }
    }
}

/// Queryable configuration built from an explicit layer stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Lowest precedence first.
    layers: Vec<Layer>,
}

impl Default for Config {
    /// Built-in defaults plus an empty runtime layer; no file, no environment.
    fn default() -> Self {
        Self::from_layers(vec![Layer::builtin_defaults(), Layer::runtime()])
    }
}

impl Config {
    /// Build from layers listed lowest precedence first.
    pub fn from_layers(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// Defaults, process environment and an empty runtime layer.
    pub fn new() -> Self {
        Self::from_layers(vec![
            Layer::builtin_defaults(),
            Layer::Environment(EnvOverrides::from_process()),
            Layer::runtime(),
        ])
    }

    /// Defaults, `file` (when given), process environment, runtime.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut config = Self::new();
        if let Some(file) = file {
            config.load_from_file(file)?;
        }
        Ok(config)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Path of the loaded file layer, if any.
    pub fn file_path(&self) -> Option<&Path> {
        self.layers.iter().find_map(|layer| match layer {
            Layer::File { path, .. } => Some(path.as_path()),
            _ => None,
        })
    }

    /// Most specific value at `dotted`, or `None`.
    ///
    /// A section (mapping) is read from the merged tree so keys from every
    /// layer show up in it.
    pub fn lookup(&self, dotted: &str) -> Option<Value> {
        let segments = path::split(dotted).ok()?;
        let top = self
            .layers
            .iter()
            .rev()
            .find_map(|layer| layer.lookup(dotted, &segments))?;

        if top.is_mapping() {
            return path::lookup(&self.effective(), &segments).cloned();
        }
        Some(top)
    }

    /// Most specific value at `dotted`, or `default`.
    pub fn get(&self, dotted: &str, default: impl Into<Value>) -> Value {
        self.lookup(dotted).unwrap_or_else(|| default.into())
    }

    /// Value at `dotted` deserialized as `T`.
    ///
    /// `Ok(None)` when the path is unset; an error when it is set to
    /// something that is not a `T`.
    pub fn get_as<T: DeserializeOwned>(&self, dotted: &str) -> Result<Option<T>> {
        self.lookup(dotted)
            .map(|value| {
                serde_yaml::from_value(value).map_err(|source| Error::Deserialize {
                    path: dotted.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Set a runtime override, creating intermediate levels as needed.
    pub fn set(&mut self, dotted: &str, value: impl Into<Value>) -> Result<()> {
        let segments = path::split(dotted)?;

        let runtime = match self
            .layers
            .iter()
            .rposition(|l| matches!(l, Layer::Runtime(_)))
        {
            Some(idx) => idx,
            None => {
                self.layers.push(Layer::runtime());
                self.layers.len() - 1
            }
        };

        if let Layer::Runtime(values) = &mut self.layers[runtime] {
            path::insert(values, &segments, value.into());
        }
        Ok(())
    }

    /// Replace the file layer with the contents of `file`.
    ///
    /// On any error the configuration is left exactly as it was.
    pub fn load_from_file(&mut self, file: &Path) -> Result<()> {
        let content = fs::read_to_string(file).map_err(|source| Error::FileAccess {
            path: file.to_path_buf(),
            source,
        })?;

        let values: Value = serde_yaml::from_str(&content).map_err(|source| Error::Parse {
            path: file.to_path_buf(),
            source,
        })?;
        let values = match values {
            Value::Null => Value::Mapping(Mapping::new()),
            Value::Mapping(_) => values,
            _ => {
                return Err(Error::NotAMapping {
                    path: file.to_path_buf(),
                });
            }
        };

        let layer = Layer::File {
            path: file.to_path_buf(),
            values,
        };

        match self
            .layers
            .iter()
            .position(|l| matches!(l, Layer::File { .. }))
        {
            Some(idx) => self.layers[idx] = layer,
            None => {
                let above_defaults = self
                    .layers
                    .iter()
                    .rposition(|l| matches!(l, Layer::Defaults(_)))
                    .map_or(0, |idx| idx + 1);
                self.layers.insert(above_defaults, layer);
            }
        }

        log::info!("loaded configuration from {}", file.display());
        Ok(())
    }

    /// Merged view of every layer.
    ///
    /// Environment layers can only override keys some lower layer already
    /// defines, since variable names cannot be mapped back to paths.
    pub fn effective(&self) -> Value {
        let mut merged = Value::Mapping(Mapping::new());
        for layer in &self.layers {
            match layer {
                Layer::Defaults(values) | Layer::File { values, .. } | Layer::Runtime(values) => {
                    path::merge(&mut merged, values);
                }
                Layer::Environment(env) => {
                    for dotted in path::leaf_paths(&merged) {
                        if let Some(value) = env.lookup(&dotted) {
                            let segments: Vec<&str> = dotted.split('.').collect();
                            path::insert(&mut merged, &segments, value);
                        }
                    }
                }
            }
        }
        merged
    }

    /// Effective configuration as the typed [`Settings`] struct.
    ///
    /// On a type mismatch the error names the offending key.
    pub fn settings(&self) -> Result<Settings> {
        let effective = self.effective();
        serde_yaml::from_value(effective.clone()).map_err(|source| Error::Deserialize {
            path: mistyped_key(&effective).unwrap_or_default(),
            source,
        })
    }

    /// Effective configuration as YAML text.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.effective()).map_err(Error::Serialize)
    }

    /// Write the effective configuration to `file` as YAML.
    pub fn save_to_file(&self, file: &Path) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(file, yaml).map_err(|source| Error::FileAccess {
            path: file.to_path_buf(),
            source,
        })?;
        log::info!("saved configuration to {}", file.display());
        Ok(())
    }
}

/// First dotted key whose value does not fit its typed section.
fn mistyped_key(effective: &Value) -> Option<String> {
    first_bad_key::<EsimSettings>(effective, "esim")
        .or_else(|| first_bad_key::<SimulationSettings>(effective, "simulation"))
        .or_else(|| first_bad_key::<CircuitSettings>(effective, "circuit"))
}

fn first_bad_key<T: DeserializeOwned>(effective: &Value, section: &str) -> Option<String> {
    let value = path::lookup(effective, &[section])?;
    let Value::Mapping(map) = value else {
        return Some(section.to_string());
    };

    map.iter().find_map(|(key, field)| {
        let mut single = Mapping::new();
        single.insert(key.clone(), field.clone());
        serde_yaml::from_value::<T>(Value::Mapping(single))
            .is_err()
            .then(|| format!("{}.{}", section, key.as_str().unwrap_or("?")))
    })
}

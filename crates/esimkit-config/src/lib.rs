//! Layered configuration for esimkit.
//!
//! Values are looked up by dotted path (`esim.timeout`) across an explicit
//! stack of layers: built-in defaults, an optional YAML file, `ESIM_*`
//! environment variables and runtime overrides. The merged tree can be read
//! back as the typed [`Settings`] struct or written out as YAML.
//!
//! # Example
//!
//! ```
//! use esimkit_config::{Config, EnvOverrides, Layer};
//! use serde_yaml::Value;
//!
//! let mut config = Config::from_layers(vec![
//!     Layer::builtin_defaults(),
//!     Layer::Environment(EnvOverrides::from_pairs([("ESIM_TIMEOUT", "90")])),
//!     Layer::runtime(),
//! ]);
//! assert_eq!(config.get("esim.timeout", Value::Null), Value::from(90));
//!
//! config.set("esim.timeout", 120).unwrap();
//! assert_eq!(config.get_as::<u64>("esim.timeout").unwrap(), Some(120));
//! ```

pub mod env;
pub mod error;
pub mod layers;
pub mod path;
pub mod settings;

pub use env::{ENV_ALIASES, ENV_PREFIX, EnvOverrides, env_var_name};
pub use error::{Error, Result};
pub use layers::{Config, Layer};
pub use settings::{CircuitSettings, EsimSettings, Settings, SimulationSettings};

pub use serde_yaml::Value;

//! Error types for esimkit-config.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, querying or saving configuration.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file missing or unreadable/unwritable.
    #[error("cannot access config file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid YAML.
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Configuration file parsed, but its top level is not a mapping.
    #[error("config file {path} must contain a mapping at the top level")]
    NotAMapping { path: PathBuf },

    /// Effective configuration could not be serialized.
    #[error("cannot serialize configuration: {0}")]
    Serialize(#[source] serde_yaml::Error),

    /// Dotted path is empty or has an empty segment.
    #[error("invalid config path: '{0}'")]
    InvalidPath(String),

    /// A value exists but does not have the requested type.
    #[error("config value at '{path}' has the wrong type: {source}")]
    Deserialize {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

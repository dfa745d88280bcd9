//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// The config file itself is missing.
    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    /// A configuration field has an invalid value.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Template serialization or write failure.
    #[error("failed to write config template: {0}")]
    Template(String),
}

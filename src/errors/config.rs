//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read or written
    #[error("Failed to access config file {}: {source}", path.display())]
    Io {
        /// Path of the config file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid YAML for the expected schema
    #[error("Invalid config format: {0}")]
    Format(#[from] serde_yaml::Error),

    /// A value is outside its allowed range
    #[error("Invalid config value for '{field}': {reason}")]
    InvalidValue {
        /// Dotted field path, e.g. `session.broadcast_buffer`
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Check if this is a validation error (as opposed to I/O or parsing)
    pub fn is_validation_error(&self) -> bool {
        matches!(self, ConfigError::InvalidValue { .. })
    }
}

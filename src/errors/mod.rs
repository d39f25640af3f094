//! Domain-specific error types for storyflow
//!
//! # Error Categories
//!
//! - **FlowError**: Flow graph operations (blocks, connections, DTO import)
//! - **ConfigError**: Loading and validating the YAML configuration
//!
//! The session store has no failure modes of its own: clearing an absent
//! story is a no-op and sub-entities are accepted as given.

pub mod config;
pub mod flow;

pub use config::ConfigError;
pub use flow::FlowError;

/// Result type alias for flow graph operations
pub type FlowResult<T> = Result<T, FlowError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockId;

    #[test]
    fn test_flow_result_alias() {
        let result: FlowResult<()> = Err(FlowError::BlockNotFound(BlockId::from("b1")));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_result_alias() {
        let result: ConfigResult<()> = Err(ConfigError::InvalidValue {
            field: "session.broadcast_buffer",
            reason: "must be greater than zero".to_string(),
        });
        assert!(result.unwrap_err().is_validation_error());
    }
}

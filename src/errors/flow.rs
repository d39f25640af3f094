//! Flow graph error types
//!
//! Every rejected graph operation is reported through [`FlowError`]. A rejected
//! operation never changes the graph.
//!
//! # Examples
//!
//! ```rust
//! use storyflow::errors::FlowError;
//! use storyflow::model::BlockId;
//!
//! let err = FlowError::SelfLoop(BlockId::from("text-1"));
//! assert!(err.is_client_error());
//! assert_eq!(err.to_string(), "Block 'text-1' cannot be connected to itself");
//! ```

use thiserror::Error;

use crate::model::{BlockId, ConnectionId};

/// Flow graph errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    /// Connection source and target are the same block
    #[error("Block '{0}' cannot be connected to itself")]
    SelfLoop(BlockId),

    /// Block not found by identifier
    #[error("Block '{0}' not found")]
    BlockNotFound(BlockId),

    /// Connection not found by identifier
    #[error("Connection '{0}' not found")]
    ConnectionNotFound(ConnectionId),

    /// A connection between the same two blocks already exists
    #[error("Connection {from} -> {to} already exists")]
    ConnectionAlreadyExists {
        /// Source block identifier
        from: BlockId,
        /// Target block identifier
        to: BlockId,
    },

    /// Block identifier already used in this graph
    #[error("Block '{0}' already exists")]
    BlockAlreadyExists(BlockId),

    /// Connection identifier already used in this graph
    #[error("Connection '{0}' already exists")]
    ConnectionIdInUse(ConnectionId),

    /// Connection references a block that is not part of the graph
    #[error("Connection '{connection}' references missing block '{block}'")]
    DanglingConnection {
        /// Offending connection
        connection: ConnectionId,
        /// Missing endpoint
        block: BlockId,
    },

    /// Internal reverse index disagrees with the connection table
    #[error("Connection index is inconsistent for block '{0}'")]
    IndexInconsistent(BlockId),
}

impl FlowError {
    /// Check if this error was caused by the caller's request rather than graph corruption
    pub fn is_client_error(&self) -> bool {
        !matches!(self, FlowError::IndexInconsistent(_))
    }

    /// Check if this is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FlowError::BlockNotFound(_) | FlowError::ConnectionNotFound(_)
        )
    }
}

//! Error types for the graph model

use thiserror::Error;

use crate::node::PortDirection;

/// Result type alias using GraphError
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors returned by graph, node and viewport operations.
///
/// Geometric misses are not errors: hit-tests return `Option`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// No node with this id
    #[error("Node {0} not found")]
    NodeNotFound(String),

    /// No connection with this id
    #[error("Connection {0} not found")]
    ConnectionNotFound(String),

    /// The node has no port with this id in the given direction
    #[error("{direction} port {port_id} not found on node {node_id}")]
    PortNotFound {
        node_id: String,
        port_id: String,
        direction: PortDirection,
    },

    /// A node with this id is already registered
    #[error("Node with id {0} already exists")]
    DuplicateNode(String),

    /// A connection with this id is already registered
    #[error("Connection with id {0} already exists")]
    DuplicateConnection(String),

    /// Two ports in the same direction list share an id
    #[error("Duplicate {direction} port {port_id} on node {node_id}")]
    DuplicatePort {
        node_id: String,
        port_id: String,
        direction: PortDirection,
    },

    /// Committing the edge would close a directed cycle
    #[error("Connecting {from} -> {to} would create a cycle")]
    CycleDetected { from: String, to: String },

    /// Viewport scale must be finite and strictly positive
    #[error("Invalid viewport scale {0}")]
    InvalidScale(f32),
}

impl GraphError {
    /// Lookup of a missing node, connection or port.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NodeNotFound(_) | Self::ConnectionNotFound(_) | Self::PortNotFound { .. }
        )
    }

    /// Id collision on insertion.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateNode(_) | Self::DuplicateConnection(_) | Self::DuplicatePort { .. }
        )
    }
}

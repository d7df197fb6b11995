//! Error types for DOM operations
//!
//! Simple, flat error hierarchy. No over-engineering.

use crate::types::{NodeId, NodeType};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("Node {child} is not a child of node {parent}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("Cannot insert node {child} under node {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("No serializer for node type {0:?}")]
    UnsupportedNodeKind(NodeType),

    #[error("Unknown property '{property}' on <{tag}>")]
    UnknownProperty { tag: String, property: String },

    #[error("Maximum tree depth exceeded: {current} > {max}")]
    MaxDepthExceeded { current: usize, max: usize },

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),
}

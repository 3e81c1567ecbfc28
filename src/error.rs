//! Error types for brokerage computations

use thiserror::Error;

/// Invalid caller input. Raised before any computation starts and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A group names a node the graph does not contain.
    #[error("group {group} contains node {node} which is not in the graph")]
    UnknownNode { group: usize, node: String },

    /// A graph node is not covered by any group.
    #[error("node {node} does not belong to any group")]
    UngroupedNode { node: String },

    /// A group without members.
    #[error("group {group} is empty")]
    EmptyGroup { group: usize },

    /// Direction string other than `in`, `out` or `all`.
    #[error("direction should be either 'in', 'out' or 'all', got '{0}'")]
    UnknownDirection(String),

    /// Overlap strategy string other than `decouple` or `direct`.
    #[error("overlap strategy should be either 'decouple' or 'direct', got '{0}'")]
    UnknownOverlapStrategy(String),

    /// Measure string other than `global`, `local` or `external`.
    #[error("measure should be either 'global', 'local' or 'external', got '{0}'")]
    UnknownMeasure(String),
}

/// Result type for brokerage operations.
pub type Result<T> = std::result::Result<T, ValidationError>;

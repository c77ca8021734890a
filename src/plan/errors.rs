//! Plan-normalization error types
//!
//! All of these are structural faults in the captured plan and abort the
//! whole run; there is no partial annotation output on failure.

use thiserror::Error;

/// Result type for plan operations
pub type PlanResult<T> = Result<T, PlanError>;

/// Structural faults in a captured plan tree
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlanError {
    /// A binary join node arrived with the wrong number of children
    #[error("{node_type} node has {actual} children, expected exactly 2")]
    BadJoinArity { node_type: String, actual: usize },

    /// A node is missing a field its node type requires
    #[error("{node_type} node is missing required field '{field}'")]
    MissingField {
        node_type: String,
        field: &'static str,
    },
}

impl PlanError {
    pub(crate) fn bad_arity(node_type: &str, actual: usize) -> Self {
        Self::BadJoinArity {
            node_type: node_type.to_string(),
            actual,
        }
    }

    pub(crate) fn missing(node_type: &str, field: &'static str) -> Self {
        Self::MissingField {
            node_type: node_type.to_string(),
            field,
        }
    }
}

//! Error types for the document tree

use crate::element::ElementType;
use thiserror::Error;

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Every variant is recoverable: the failed call left the tree untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("Instance not found: {0}")]
    NotFound(String),

    #[error("Placement violation: {child} cannot be placed inside {parent} ({reason})")]
    PlacementViolation {
        child: ElementType,
        parent: ElementType,
        reason: String,
    },

    #[error("Moving {id} into {target} would create a cycle")]
    CycleViolation { id: String, target: String },

    #[error("Instance id already in use: {0}")]
    DuplicateId(String),

    #[error("The root instance cannot be moved or deleted")]
    RootImmutable,

    #[error("Invalid prop {prop} on {element_type}: {reason}")]
    InvalidProp {
        element_type: ElementType,
        prop: String,
        reason: String,
    },
}

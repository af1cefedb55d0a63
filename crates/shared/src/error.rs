use thiserror::Error;

use crate::domain::PointId;

/// Reasons the collection model refuses a mutation. A refused mutation leaves
/// the collection untouched and emits no notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("point {0} not found")]
    NotFound(PointId),
    #[error("point {0} already exists")]
    Duplicate(PointId),
    #[error("invalid point: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseKindError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseKindError {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

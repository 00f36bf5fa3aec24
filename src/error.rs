use thiserror::Error;

use crate::datastore::ServiceError;
use crate::entity::{IdKind, Identifier};

/// Error type shared by every repository backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The entity shape does not serialize to a record.
    #[error("invalid entity shape for {kind}: {reason}")]
    InvalidEntityShape { kind: String, reason: String },

    /// The serialized record has no member for the identifier field.
    #[error("identifier field {field:?} not found on {kind}")]
    IdentifierFieldNotFound { kind: String, field: String },

    /// Data of one kind reached a repository bound to another.
    #[error("shape mismatch: expected kind {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("identifier of {kind} must be {expected}, got {actual}")]
    IdentifierTypeMismatch {
        kind: String,
        expected: IdKind,
        actual: IdKind,
    },

    /// The entity carries the zero identifier where a stored one is required.
    #[error("identifier of {kind} is unset")]
    UnsetIdentifier { kind: String },

    /// No identifier is left to hand out for a new record.
    #[error("identifiers exhausted for {kind}")]
    IdentifiersExhausted { kind: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: Identifier },

    #[error("entity serialization error: {0}")]
    Serialization(String),

    /// Passed through unchanged from the key-value service.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound { .. })
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}

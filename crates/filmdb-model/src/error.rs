use filmdb_store::StoreError;
use filmdb_types::ConstraintViolation;
use thiserror::Error;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A property constraint was violated; the catalog is unchanged.
    #[error(transparent)]
    Violation(#[from] ConstraintViolation),

    /// The targeted record does not exist.
    #[error("there is no {collection} record with ID {id}")]
    NotFound { collection: &'static str, id: String },

    /// A stored blob is not a JSON object of records.
    #[error("blob {key} is corrupt: {reason}")]
    CorruptBlob { key: &'static str, reason: String },

    /// A collection could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The blob store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ModelError {
    /// The violated constraint, if this error is a violation.
    pub fn violation(&self) -> Option<&ConstraintViolation> {
        match self {
            Self::Violation(v) => Some(v),
            _ => None,
        }
    }
}

/// Result alias for catalog operations.
pub type ModelResult<T> = Result<T, ModelError>;

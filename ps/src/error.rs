//! Store error types

use thiserror::Error;

/// Errors raised by the record store and its backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("This Neural ID is already registered: {0}")]
    DuplicateIdentity(String),

    #[error("Neural ID not found in database: {0}")]
    IdentityNotFound(String),

    #[error("Unauthorized: Session Expired")]
    Unauthorized,

    #[error("Operational Record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode data for key '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Corrupt data under key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Check if this error came from the persistence medium rather than caller input
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            StoreError::Io(_) | StoreError::Encode { .. } | StoreError::Corrupt { .. }
        )
    }
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

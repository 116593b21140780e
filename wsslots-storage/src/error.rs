//! Error types for the storage layer.

use thiserror::Error;
use wsslots_model::StoreError;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from DuckDB.
    #[error("database error: {0}")]
    Database(#[from] duckdb::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored row could not be decoded.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The connection mutex was poisoned by a panicking writer.
    #[error("connection lock poisoned")]
    LockPoisoned,

    /// The write was refused (conflict, existing page).
    #[error(transparent)]
    Rejected(#[from] StoreError),
}

impl From<wsslots_types::Error> for StorageError {
    fn from(e: wsslots_types::Error) -> Self {
        Self::InvalidData(e.to_string())
    }
}

impl From<StorageError> for StoreError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Rejected(inner) => inner,
            other => StoreError::Backend(other.to_string()),
        }
    }
}

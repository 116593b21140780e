//! Error type shared by the collaborator traits.

use thiserror::Error;
use wsslots_types::{RevisionId, Title};

/// Result type for collaborator operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a collaborator can report back to the coordinator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The page moved past the revision the edit was based on.
    #[error("edit conflict on \"{title}\": expected base revision {expected:?}, found {actual:?}")]
    EditConflict {
        title: Title,
        expected: Option<RevisionId>,
        actual: Option<RevisionId>,
    },

    /// A concurrent edit created the page first.
    #[error("the page \"{0}\" already exists")]
    PageExists(Title),

    /// The storage layer refused the write.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Any other backend failure (I/O, database, corrupt rows).
    #[error("storage error: {0}")]
    Backend(String),
}

impl StoreError {
    /// The API error code for this failure.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EditConflict { .. } => "editconflict",
            Self::PageExists(_) => "articleexists",
            Self::PermissionDenied(_) => "permissiondenied",
            Self::Backend(_) => "storage-error",
        }
    }
}

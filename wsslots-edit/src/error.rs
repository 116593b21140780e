//! Error types for the edit coordinator.

use thiserror::Error;
use wsslots_model::StoreError;
use wsslots_types::{SlotRole, Title};

/// Result type for edit operations.
pub type EditResult<T> = Result<T, EditError>;

/// Why an edit was refused. Every variant leaves storage untouched.
#[derive(Debug, Error)]
pub enum EditError {
    /// Two flags that cannot be combined were both set.
    #[error("the parameters \"{0}\" and \"{1}\" can not be used together")]
    ConflictingFlags(&'static str, &'static str),

    /// The request named no slots.
    #[error("no slots were given to edit")]
    NoSlots,

    /// `createonly` was set but the page exists.
    #[error("the page \"{0}\" already exists")]
    PageExists(Title),

    /// `nocreate` was set but the page does not exist.
    #[error("the page \"{0}\" does not exist")]
    PageMissing(Title),

    /// A slot role the registry does not know, with no prior content to
    /// take a model from.
    #[error("the slot \"{0}\" is not known to the slot registry")]
    UnknownSlot(SlotRole),

    /// Merged content is not valid for the slot's content model.
    #[error("invalid content for slot \"{role}\": {reason}")]
    InvalidContent { role: SlotRole, reason: String },

    /// Failure reported by a collaborator, passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EditError {
    /// The API error code for this failure.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConflictingFlags(..) => "invalidparammix",
            Self::NoSlots => "noslots",
            Self::PageExists(_) => "articleexists",
            Self::PageMissing(_) => "missingtitle",
            Self::UnknownSlot(_) => "unknownslot",
            Self::InvalidContent { .. } => "invalidcontent",
            Self::Store(e) => e.code(),
        }
    }
}

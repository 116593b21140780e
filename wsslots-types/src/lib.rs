//! Core type definitions for WSSlots.
//!
//! This crate defines the plugin-agnostic vocabulary shared by the storage
//! layer, the edit coordinator and the API:
//! - Page and revision identifiers
//! - Normalized page titles
//! - Slots, slot roles and content models
//! - Revisions and their metadata
//! - Watchlist preferences
//!
//! Nothing here talks to storage; these are plain values.

mod ids;
mod revision;
mod slot;
mod title;
mod watchlist;

pub use ids::{ActorId, PageId, RevisionId};
pub use revision::{Page, Revision, RevisionMeta};
pub use slot::{ContentModel, Slot, SlotRole, SlotUpdates};
pub use title::Title;
pub use watchlist::{WatchPreferences, WatchlistPref};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while constructing or validating types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid title: {0}")]
    InvalidTitle(String),

    #[error("invalid slot role: {0}")]
    InvalidSlotRole(String),

    #[error("unknown content model: {0}")]
    UnknownContentModel(String),

    #[error("content is not valid {model}: {reason}")]
    InvalidContent { model: ContentModel, reason: String },

    #[error("invalid page id: {0}")]
    InvalidPageId(String),

    #[error("invalid watchlist value: {0}")]
    InvalidWatchlist(String),

    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),
}

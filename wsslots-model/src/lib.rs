//! Collaborator contracts for WSSlots.
//!
//! The edit coordinator never reaches for global services. Everything it
//! needs is one of the traits below, handed to it at construction:
//! - [`ContentStore`]: page resolution, revision reads and atomic revision writes
//! - [`WatchService`]: per-actor watch-state
//! - [`SlotRegistry`]: the closed set of slot roles the wiki knows about
//!
//! [`StoreError`] is the error type shared by all collaborators. It carries an
//! API error code so failures can be surfaced to callers verbatim.

mod error;
mod registry;
mod store;
mod watch;

pub use error::{StoreError, StoreResult};
pub use registry::{SlotDefinition, SlotRegistry, StaticSlotRegistry};
pub use store::ContentStore;
pub use watch::WatchService;

//! Slot edit coordinator for WSSlots.
//!
//! Turns "set these slots on this page" into a new revision:
//!
//! 1. **Validate**: flag combinations and the page-existence precondition
//! 2. **Merge**: replace, append or prepend each requested slot
//! 3. **Check**: every merged slot against its content model
//! 4. **Persist**: one atomic revision with all untouched slots carried over
//! 5. **Watch**: apply the editor's watchlist preference
//!
//! Permission checks, token validation and title resolution happen before
//! the coordinator is called. Conflicts between concurrent edits are detected
//! by the [`ContentStore`](wsslots_model::ContentStore) and surface as errors;
//! nothing here retries.
//!
//! # Example
//!
//! ```
//! use wsslots_edit::{EditRequest, SlotEditor};
//! use wsslots_model::{ContentStore, StaticSlotRegistry};
//! use wsslots_storage::RevisionStore;
//! use wsslots_types::{ActorId, SlotRole, SlotUpdates, Title};
//!
//! let store = RevisionStore::open_in_memory().unwrap();
//! let registry = StaticSlotRegistry::main_only();
//! let editor = SlotEditor::new(&store, &store, &registry);
//!
//! let page = store.page_by_title(&Title::new("Sandbox").unwrap()).unwrap();
//! let updates = SlotUpdates::new().with(SlotRole::main(), "Hello");
//! let outcome = editor
//!     .edit_slots(EditRequest::new(ActorId::user("Alice"), page, updates))
//!     .unwrap();
//! assert!(outcome.created);
//! ```

mod editor;
mod error;
mod merge;

pub use editor::{EditRequest, EditSuccess, SlotEditor};
pub use error::{EditError, EditResult};
pub use merge::MergeMode;

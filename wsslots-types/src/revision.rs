//! Pages and revisions.
//!
//! A revision is an immutable snapshot of every slot of a page plus the
//! metadata of the edit that produced it. Pages only point at their latest
//! revision.

use crate::{ActorId, PageId, RevisionId, Slot, SlotRole, Title};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A resolved page reference.
///
/// Pages that have never been saved still resolve (by title) so that they
/// can be created; they carry no id and no latest revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: Option<PageId>,
    pub title: Title,
    pub latest: Option<RevisionId>,
}

impl Page {
    /// A page that does not exist yet.
    #[must_use]
    pub fn missing(title: Title) -> Self {
        Self {
            id: None,
            title,
            latest: None,
        }
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.latest.is_some()
    }
}

/// Metadata recorded with every revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionMeta {
    pub actor: ActorId,
    pub summary: String,
    pub minor: bool,
    pub bot: bool,
    pub timestamp: DateTime<Utc>,
}

impl RevisionMeta {
    #[must_use]
    pub fn new(actor: ActorId, summary: impl Into<String>) -> Self {
        Self {
            actor,
            summary: summary.into(),
            minor: false,
            bot: false,
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn minor(mut self, minor: bool) -> Self {
        self.minor = minor;
        self
    }

    #[must_use]
    pub fn bot(mut self, bot: bool) -> Self {
        self.bot = bot;
        self
    }
}

/// A stored revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub id: RevisionId,
    pub page_id: PageId,
    pub parent: Option<RevisionId>,
    pub meta: RevisionMeta,
    /// Slots sorted by role.
    pub slots: Vec<Slot>,
}

impl Revision {
    /// Looks up the slot with the given role.
    #[must_use]
    pub fn slot(&self, role: &SlotRole) -> Option<&Slot> {
        self.slots.iter().find(|s| &s.role == role)
    }

    #[must_use]
    pub fn roles(&self) -> Vec<&SlotRole> {
        self.slots.iter().map(|s| &s.role).collect()
    }
}

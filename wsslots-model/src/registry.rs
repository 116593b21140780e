use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wsslots_types::{ContentModel, SlotRole};

/// The closed set of slot roles known to the wiki.
pub trait SlotRegistry: Send + Sync {
    /// All known roles, sorted by name.
    fn known_roles(&self) -> Vec<SlotRole>;

    /// The content model new slots of `role` are created with.
    fn model_for(&self, role: &SlotRole) -> Option<ContentModel>;

    fn is_known(&self, role: &SlotRole) -> bool {
        self.model_for(role).is_some()
    }
}

/// Declares one slot role and its default content model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDefinition {
    pub role: SlotRole,
    #[serde(default)]
    pub model: ContentModel,
}

impl SlotDefinition {
    pub fn new(role: SlotRole, model: ContentModel) -> Self {
        Self { role, model }
    }
}

/// A registry fixed at construction time.
///
/// The `main` role is always present; when not declared it uses wikitext.
#[derive(Debug, Clone)]
pub struct StaticSlotRegistry {
    roles: BTreeMap<SlotRole, ContentModel>,
}

impl StaticSlotRegistry {
    /// Builds a registry from definitions. A role declared twice keeps its
    /// last model.
    pub fn new(definitions: impl IntoIterator<Item = SlotDefinition>) -> Self {
        let mut roles: BTreeMap<SlotRole, ContentModel> = definitions
            .into_iter()
            .map(|def| (def.role, def.model))
            .collect();
        roles.entry(SlotRole::main()).or_insert(ContentModel::Wikitext);
        Self { roles }
    }

    /// A registry that only knows `main`.
    #[must_use]
    pub fn main_only() -> Self {
        Self::new(std::iter::empty())
    }
}

impl Default for StaticSlotRegistry {
    fn default() -> Self {
        Self::main_only()
    }
}

impl SlotRegistry for StaticSlotRegistry {
    fn known_roles(&self) -> Vec<SlotRole> {
        self.roles.keys().cloned().collect()
    }

    fn model_for(&self, role: &SlotRole) -> Option<ContentModel> {
        self.roles.get(role).copied()
    }
}

//! The slot edit coordinator.

use crate::{EditError, EditResult, MergeMode};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use wsslots_model::{ContentStore, SlotRegistry, WatchService};
use wsslots_types::{
    ActorId, ContentModel, Page, PageId, RevisionId, RevisionMeta, Slot, SlotRole, SlotUpdates,
    WatchlistPref,
};

/// One slot edit, fully resolved by the caller.
///
/// `actor` must already have been permission-checked for `page`.
#[derive(Debug, Clone)]
pub struct EditRequest {
    pub actor: ActorId,
    pub page: Page,
    pub slot_updates: SlotUpdates,
    pub summary: String,
    pub append: bool,
    pub prepend: bool,
    pub watchlist: WatchlistPref,
    pub bot: bool,
    pub minor: bool,
    pub createonly: bool,
    pub nocreate: bool,
}

impl EditRequest {
    /// A replace-mode edit with every flag off and no summary.
    pub fn new(actor: ActorId, page: Page, slot_updates: SlotUpdates) -> Self {
        Self {
            actor,
            page,
            slot_updates,
            summary: String::new(),
            append: false,
            prepend: false,
            watchlist: WatchlistPref::NoChange,
            bot: false,
            minor: false,
            createonly: false,
            nocreate: false,
        }
    }
}

/// What a successful edit produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSuccess {
    pub page_id: PageId,
    pub revision_id: RevisionId,
    /// The revision this edit replaced, if the page existed.
    pub parent: Option<RevisionId>,
    /// True when the edit created the page.
    pub created: bool,
}

/// Applies slot edits against injected collaborators.
pub struct SlotEditor<'a> {
    store: &'a dyn ContentStore,
    watch: &'a dyn WatchService,
    registry: &'a dyn SlotRegistry,
}

impl<'a> SlotEditor<'a> {
    pub fn new(
        store: &'a dyn ContentStore,
        watch: &'a dyn WatchService,
        registry: &'a dyn SlotRegistry,
    ) -> Self {
        Self {
            store,
            watch,
            registry,
        }
    }

    /// Builds and persists a revision with the requested slots merged in.
    ///
    /// Either exactly one revision is stored or, on any error, nothing is.
    pub fn edit_slots(&self, request: EditRequest) -> EditResult<EditSuccess> {
        let EditRequest {
            actor,
            page,
            slot_updates,
            summary,
            append,
            prepend,
            watchlist,
            bot,
            minor,
            createonly,
            nocreate,
        } = request;

        let mode = MergeMode::from_flags(append, prepend)
            .ok_or(EditError::ConflictingFlags("append", "prepend"))?;
        if createonly && nocreate {
            return Err(EditError::ConflictingFlags("createonly", "nocreate"));
        }
        if slot_updates.is_empty() {
            return Err(EditError::NoSlots);
        }

        let current = self.store.latest_revision(&page)?;
        let exists = current.is_some();
        if createonly && exists {
            return Err(EditError::PageExists(page.title));
        }
        if nocreate && !exists {
            return Err(EditError::PageMissing(page.title));
        }

        let mut slots: BTreeMap<SlotRole, Slot> = current
            .as_ref()
            .map(|rev| {
                rev.slots
                    .iter()
                    .map(|slot| (slot.role.clone(), slot.clone()))
                    .collect()
            })
            .unwrap_or_default();

        for (role, requested) in slot_updates.iter() {
            let prior = slots.get(role);
            let model = match prior {
                Some(slot) => slot.model,
                None => self
                    .registry
                    .model_for(role)
                    .ok_or_else(|| EditError::UnknownSlot(role.clone()))?,
            };
            let content = mode.apply(prior.map(|slot| slot.content.as_str()), requested);
            model
                .validate(&content)
                .map_err(|e| EditError::InvalidContent {
                    role: role.clone(),
                    reason: e.to_string(),
                })?;

            debug!(
                "Merged slot {} of \"{}\" ({:?}, {} bytes)",
                role,
                page.title,
                mode,
                content.len()
            );
            slots.insert(role.clone(), Slot::new(role.clone(), model, content));
        }

        if !slots.contains_key(&SlotRole::main()) {
            let model = self
                .registry
                .model_for(&SlotRole::main())
                .unwrap_or_default();
            slots.insert(
                SlotRole::main(),
                Slot::new(SlotRole::main(), model, empty_content(model)),
            );
        }

        let base = current.as_ref().map(|rev| rev.id);
        let meta = RevisionMeta::new(actor.clone(), summary)
            .minor(minor)
            .bot(bot);
        let revision = self
            .store
            .create_revision(&page, base, slots.into_values().collect(), meta)?;

        let created = base.is_none();
        if let Err(e) = self
            .watch
            .apply(&actor, revision.page_id, watchlist, created)
        {
            warn!(
                "Revision {} saved but updating the watchlist of {} failed: {}",
                revision.id, actor, e
            );
        }

        info!(
            "{} saved revision {} of \"{}\" ({} slot(s) edited{})",
            actor,
            revision.id,
            page.title,
            slot_updates.len(),
            if created { ", page created" } else { "" }
        );

        Ok(EditSuccess {
            page_id: revision.page_id,
            revision_id: revision.id,
            parent: base,
            created,
        })
    }
}

/// The smallest valid content for a model, used when a new page gets its
/// `main` slot implicitly.
fn empty_content(model: ContentModel) -> &'static str {
    match model {
        ContentModel::Json => "{}",
        _ => "",
    }
}

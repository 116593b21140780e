use crate::StoreResult;
use wsslots_types::{Page, PageId, Revision, RevisionId, RevisionMeta, Slot, SlotRole, Title};

/// Revision storage for pages.
///
/// Implementations must make [`ContentStore::create_revision`] atomic: either
/// the whole revision (page pointer, metadata and every slot) becomes visible
/// or none of it does.
pub trait ContentStore: Send + Sync {
    /// Resolves a title. Pages that were never saved resolve to
    /// [`Page::missing`].
    fn page_by_title(&self, title: &Title) -> StoreResult<Page>;

    /// Resolves a numeric page id. Unknown ids return `None`.
    fn page_by_id(&self, id: PageId) -> StoreResult<Option<Page>>;

    /// Loads the page's current revision, if the page exists.
    fn latest_revision(&self, page: &Page) -> StoreResult<Option<Revision>>;

    /// Loads one slot of the page's current revision.
    fn slot_content(&self, page: &Page, role: &SlotRole) -> StoreResult<Option<Slot>> {
        Ok(self
            .latest_revision(page)?
            .and_then(|rev| rev.slots.into_iter().find(|s| &s.role == role)))
    }

    /// Persists a new revision carrying exactly `slots`.
    ///
    /// `base` is the latest revision the caller observed (`None` when the
    /// caller believes the page does not exist). A stale base fails with
    /// [`StoreError::EditConflict`](crate::StoreError::EditConflict), or
    /// [`StoreError::PageExists`](crate::StoreError::PageExists) if the page
    /// was created concurrently.
    fn create_revision(
        &self,
        page: &Page,
        base: Option<RevisionId>,
        slots: Vec<Slot>,
        meta: RevisionMeta,
    ) -> StoreResult<Revision>;

    /// Lists all revisions of a page, oldest first.
    fn revisions(&self, page: &Page) -> StoreResult<Vec<Revision>>;
}

use crate::StoreResult;
use wsslots_types::{ActorId, PageId, WatchPreferences, WatchlistPref};

/// Per-actor watch-state.
pub trait WatchService: Send + Sync {
    fn is_watched(&self, actor: &ActorId, page: PageId) -> StoreResult<bool>;

    fn watch(&self, actor: &ActorId, page: PageId) -> StoreResult<()>;

    fn unwatch(&self, actor: &ActorId, page: PageId) -> StoreResult<()>;

    /// The actor's stored defaults, or [`WatchPreferences::default`].
    fn preferences(&self, actor: &ActorId) -> StoreResult<WatchPreferences>;

    fn set_preferences(&self, actor: &ActorId, prefs: WatchPreferences) -> StoreResult<()>;

    /// Applies the watch-state side effect of an edit.
    ///
    /// Anonymous actors have no watchlist; the call is a no-op for them.
    /// `created` is true when the edit created the page.
    fn apply(
        &self,
        actor: &ActorId,
        page: PageId,
        pref: WatchlistPref,
        created: bool,
    ) -> StoreResult<()> {
        if actor.is_anonymous() {
            return Ok(());
        }
        match pref {
            WatchlistPref::Watch => self.watch(actor, page),
            WatchlistPref::Unwatch => self.unwatch(actor, page),
            WatchlistPref::Preferences => {
                if self.preferences(actor)?.wants_watch(created) {
                    self.watch(actor, page)
                } else {
                    Ok(())
                }
            }
            WatchlistPref::NoChange => Ok(()),
        }
    }
}

use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::sync::Mutex;
use wsslots_model::{
    SlotDefinition, SlotRegistry, StaticSlotRegistry, StoreError, StoreResult, WatchService,
};
use wsslots_types::{
    ActorId, ContentModel, PageId, RevisionId, SlotRole, Title, WatchPreferences, WatchlistPref,
};

fn role(name: &str) -> SlotRole {
    SlotRole::new(name).unwrap()
}

// ── StaticSlotRegistry ───────────────────────────────────────────

#[test]
fn registry_always_knows_main() {
    let registry = StaticSlotRegistry::main_only();
    assert_eq!(registry.known_roles(), vec![SlotRole::main()]);
    assert_eq!(registry.model_for(&SlotRole::main()), Some(ContentModel::Wikitext));
}

#[test]
fn registry_keeps_declared_main_model() {
    let registry = StaticSlotRegistry::new(vec![SlotDefinition::new(
        SlotRole::main(),
        ContentModel::Text,
    )]);
    assert_eq!(registry.model_for(&SlotRole::main()), Some(ContentModel::Text));
}

#[test]
fn registry_roles_are_sorted_and_closed() {
    let registry = StaticSlotRegistry::new(vec![
        SlotDefinition::new(role("ws-data"), ContentModel::Json),
        SlotDefinition::new(role("header"), ContentModel::Wikitext),
    ]);
    let names: Vec<String> = registry.known_roles().into_iter().map(String::from).collect();
    assert_eq!(names, vec!["header", "main", "ws-data"]);
    assert!(registry.is_known(&role("ws-data")));
    assert!(!registry.is_known(&role("unknown")));
}

#[test]
fn registry_last_declaration_wins() {
    let registry = StaticSlotRegistry::new(vec![
        SlotDefinition::new(role("data"), ContentModel::Text),
        SlotDefinition::new(role("data"), ContentModel::Json),
    ]);
    assert_eq!(registry.model_for(&role("data")), Some(ContentModel::Json));
}

#[test]
fn slot_definition_model_defaults_to_wikitext() {
    let def: SlotDefinition = serde_json::from_str(r#"{"role":"footer"}"#).unwrap();
    assert_eq!(def.model, ContentModel::Wikitext);
    assert!(serde_json::from_str::<SlotDefinition>(r#"{"role":"Bad Role"}"#).is_err());
}

// ── StoreError codes ─────────────────────────────────────────────

#[test]
fn store_error_codes() {
    let title = Title::new("Conflicted").unwrap();
    let conflict = StoreError::EditConflict {
        title: title.clone(),
        expected: None,
        actual: Some(RevisionId::new()),
    };
    assert_eq!(conflict.code(), "editconflict");
    assert!(conflict.to_string().contains("Conflicted"));
    assert_eq!(StoreError::PageExists(title).code(), "articleexists");
    assert_eq!(StoreError::PermissionDenied("ro".into()).code(), "permissiondenied");
    assert_eq!(StoreError::Backend("disk".into()).code(), "storage-error");
}

// ── WatchService::apply ──────────────────────────────────────────

#[derive(Default)]
struct RecordingWatch {
    watched: Mutex<HashSet<(String, u64)>>,
    prefs: WatchPreferences,
}

impl WatchService for RecordingWatch {
    fn is_watched(&self, actor: &ActorId, page: PageId) -> StoreResult<bool> {
        Ok(self
            .watched
            .lock()
            .unwrap()
            .contains(&(actor.key().to_string(), page.get())))
    }

    fn watch(&self, actor: &ActorId, page: PageId) -> StoreResult<()> {
        self.watched
            .lock()
            .unwrap()
            .insert((actor.key().to_string(), page.get()));
        Ok(())
    }

    fn unwatch(&self, actor: &ActorId, page: PageId) -> StoreResult<()> {
        self.watched
            .lock()
            .unwrap()
            .remove(&(actor.key().to_string(), page.get()));
        Ok(())
    }

    fn preferences(&self, _actor: &ActorId) -> StoreResult<WatchPreferences> {
        Ok(self.prefs)
    }

    fn set_preferences(&self, _actor: &ActorId, _prefs: WatchPreferences) -> StoreResult<()> {
        Ok(())
    }
}

#[test]
fn apply_watch_and_unwatch() {
    let service = RecordingWatch::default();
    let alice = ActorId::user("Alice");
    let page = PageId::new(7).unwrap();

    service.apply(&alice, page, WatchlistPref::Watch, false).unwrap();
    assert!(service.is_watched(&alice, page).unwrap());

    service.apply(&alice, page, WatchlistPref::NoChange, false).unwrap();
    assert!(service.is_watched(&alice, page).unwrap());

    service.apply(&alice, page, WatchlistPref::Unwatch, false).unwrap();
    assert!(!service.is_watched(&alice, page).unwrap());
}

#[test]
fn apply_preferences_follows_defaults() {
    let service = RecordingWatch::default();
    let alice = ActorId::user("Alice");
    let existing = PageId::new(1).unwrap();
    let created = PageId::new(2).unwrap();

    service.apply(&alice, existing, WatchlistPref::Preferences, false).unwrap();
    service.apply(&alice, created, WatchlistPref::Preferences, true).unwrap();

    assert!(!service.is_watched(&alice, existing).unwrap());
    assert!(service.is_watched(&alice, created).unwrap());
}

#[test]
fn apply_preferences_never_unwatches() {
    let service = RecordingWatch::default();
    let alice = ActorId::user("Alice");
    let page = PageId::new(3).unwrap();

    service.watch(&alice, page).unwrap();
    service.apply(&alice, page, WatchlistPref::Preferences, false).unwrap();
    assert!(service.is_watched(&alice, page).unwrap());
}

#[test]
fn apply_is_noop_for_anonymous() {
    let service = RecordingWatch::default();
    let page = PageId::new(4).unwrap();
    service.apply(&ActorId::Anonymous, page, WatchlistPref::Watch, true).unwrap();
    assert!(service.watched.lock().unwrap().is_empty());
}

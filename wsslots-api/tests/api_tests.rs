use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::Arc;
use wsslots_api::{AppState, Config, USER_HEADER, build_router};
use wsslots_model::{ContentStore, SlotDefinition, WatchService};
use wsslots_storage::RevisionStore;
use wsslots_types::{ActorId, ContentModel, SlotRole, Title};

const SECRET: &str = "test-secret";

fn test_config() -> Config {
    let mut config = Config::default();
    config.slots = vec![
        SlotDefinition::new(SlotRole::main(), ContentModel::Wikitext),
        SlotDefinition::new(SlotRole::new("data").unwrap(), ContentModel::Json),
        SlotDefinition::new(SlotRole::new("notes").unwrap(), ContentModel::Text),
    ];
    config.permissions.blocked = vec!["Vandal".to_string()];
    config
}

/// Spin up the HTTP server on an OS-assigned port, returning the base URL
/// and a handle on the store behind it.
async fn spawn_test_server(config: Config) -> (String, RevisionStore) {
    let store = RevisionStore::open_in_memory().unwrap();
    let state = Arc::new(AppState::from_config(&config, store.clone(), SECRET));
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://127.0.0.1:{}/api.php", port), store)
}

async fn csrf_token(base: &str, user: &str) -> String {
    let body: Value = reqwest::Client::new()
        .get(base)
        .header(USER_HEADER, user)
        .query(&[("action", "query"), ("meta", "tokens")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["query"]["tokens"]["csrftoken"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Posts an `editslots` request as `user` with a valid token.
async fn edit(base: &str, user: &str, params: &[(&str, &str)]) -> Value {
    let token = csrf_token(base, user).await;
    let mut form: Vec<(&str, &str)> = vec![("action", "editslots"), ("token", token.as_str())];
    form.extend_from_slice(params);
    reqwest::Client::new()
        .post(base)
        .header(USER_HEADER, user)
        .form(&form)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or("<no error>")
}

fn content(store: &RevisionStore, title: &str, role: &str) -> Option<String> {
    let page = store.page_by_title(&Title::new(title).unwrap()).unwrap();
    store
        .slot_content(&page, &SlotRole::new(role).unwrap())
        .unwrap()
        .map(|slot| slot.content)
}

#[tokio::test]
async fn token_endpoint_returns_per_actor_tokens() {
    let (base, _store) = spawn_test_server(test_config()).await;

    let resp = reqwest::get(format!("{}?action=query&meta=tokens", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["query"]["tokens"]["csrftoken"], "+\\");

    let alice = csrf_token(&base, "Alice").await;
    let bob = csrf_token(&base, "Bob").await;
    assert!(alice.ends_with("+\\"));
    assert_ne!(alice, bob);
}

#[tokio::test]
async fn editslots_creates_then_edits_a_page() {
    let (base, store) = spawn_test_server(test_config()).await;

    let created = edit(
        &base,
        "Alice",
        &[("title", "Sandbox"), ("slot_main", "Hello"), ("summary", "first")],
    )
    .await;
    assert_eq!(created["editslots"]["result"], "success");
    assert_eq!(created["editslots"]["new"], true);
    assert!(created["editslots"].get("oldrevid").is_none());
    let page_id = created["editslots"]["pageid"].as_u64().unwrap();

    let edited = edit(
        &base,
        "Alice",
        &[("title", "Sandbox"), ("slot_main", " world"), ("append", "1")],
    )
    .await;
    assert_eq!(edited["editslots"]["result"], "success");
    assert_eq!(edited["editslots"]["pageid"].as_u64(), Some(page_id));
    assert_eq!(edited["editslots"]["oldrevid"], created["editslots"]["newrevid"]);
    assert!(edited["editslots"].get("new").is_none());

    assert_eq!(content(&store, "Sandbox", "main").as_deref(), Some("Hello world"));
    assert_eq!(store.revision_count().unwrap(), 2);
}

#[tokio::test]
async fn editslots_sets_several_slots_in_one_revision() {
    let (base, store) = spawn_test_server(test_config()).await;

    let body = edit(
        &base,
        "Alice",
        &[
            ("title", "Recipe"),
            ("slot_main", "Pancakes"),
            ("slot_data", r#"{"eggs":2}"#),
            ("slot_bogus", "ignored"),
        ],
    )
    .await;
    assert_eq!(body["editslots"]["result"], "success");
    assert_eq!(store.revision_count().unwrap(), 1);
    assert_eq!(content(&store, "Recipe", "data").as_deref(), Some(r#"{"eggs":2}"#));
    assert_eq!(content(&store, "Recipe", "notes"), None);
}

#[tokio::test]
async fn editslots_by_page_id() {
    let (base, store) = spawn_test_server(test_config()).await;

    let created = edit(&base, "Alice", &[("title", "Numbered"), ("slot_main", "v1")]).await;
    let page_id = created["editslots"]["pageid"].as_u64().unwrap().to_string();

    let body = edit(&base, "Alice", &[("pageid", page_id.as_str()), ("slot_main", "v2")]).await;
    assert_eq!(body["editslots"]["result"], "success");
    assert_eq!(content(&store, "Numbered", "main").as_deref(), Some("v2"));

    let body = edit(&base, "Alice", &[("pageid", "999"), ("slot_main", "x")]).await;
    assert_eq!(error_code(&body), "nosuchpageid");
}

#[tokio::test]
async fn get_editslots_must_be_posted() {
    let (base, _store) = spawn_test_server(test_config()).await;

    let resp = reqwest::get(format!("{}?action=editslots&title=A&slot_main=x", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("mediawiki-api-error").unwrap(),
        "mustbeposted"
    );
    let body: Value = resp.json().await.unwrap();
    assert_eq!(error_code(&body), "mustbeposted");
}

#[tokio::test]
async fn unknown_action_is_reported() {
    let (base, _store) = spawn_test_server(test_config()).await;

    let body: Value = reqwest::get(format!("{}?action=frobnicate", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(error_code(&body), "unknown_action");
}

#[tokio::test]
async fn missing_or_wrong_token_is_refused() {
    let (base, store) = spawn_test_server(test_config()).await;
    let client = reqwest::Client::new();

    let body: Value = client
        .post(&base)
        .header(USER_HEADER, "Alice")
        .form(&[("action", "editslots"), ("title", "A"), ("slot_main", "x")])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(error_code(&body), "missingparam");

    let bob_token = csrf_token(&base, "Bob").await;
    let body: Value = client
        .post(&base)
        .header(USER_HEADER, "Alice")
        .form(&[
            ("action", "editslots"),
            ("title", "A"),
            ("slot_main", "x"),
            ("token", bob_token.as_str()),
        ])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(error_code(&body), "badtoken");
    assert_eq!(store.revision_count().unwrap(), 0);
}

#[tokio::test]
async fn anonymous_and_blocked_editors_are_refused() {
    let (base, store) = spawn_test_server(test_config()).await;

    let body = edit(&base, "", &[("title", "A"), ("slot_main", "x")]).await;
    assert_eq!(error_code(&body), "notloggedin");

    let body = edit(&base, "Vandal", &[("title", "A"), ("slot_main", "x")]).await;
    assert_eq!(error_code(&body), "blocked");

    assert_eq!(store.revision_count().unwrap(), 0);
}

#[tokio::test]
async fn anonymous_edits_when_allowed() {
    let mut config = test_config();
    config.permissions.anonymous_edit = true;
    config.permissions.anonymous_create = true;
    let (base, store) = spawn_test_server(config).await;

    let body = edit(&base, "", &[("title", "Open"), ("slot_main", "anyone")]).await;
    assert_eq!(body["editslots"]["result"], "success");
    assert_eq!(content(&store, "Open", "main").as_deref(), Some("anyone"));
}

#[tokio::test]
async fn coordinator_errors_are_passed_through() {
    let (base, store) = spawn_test_server(test_config()).await;
    edit(&base, "Alice", &[("title", "Exists"), ("slot_main", "x")]).await;

    let body = edit(
        &base,
        "Alice",
        &[("title", "Exists"), ("slot_main", "y"), ("createonly", "1")],
    )
    .await;
    assert_eq!(error_code(&body), "articleexists");

    let body = edit(
        &base,
        "Alice",
        &[("title", "Missing"), ("slot_main", "y"), ("nocreate", "1")],
    )
    .await;
    assert_eq!(error_code(&body), "missingtitle");

    let body = edit(
        &base,
        "Alice",
        &[("title", "Exists"), ("slot_main", "y"), ("append", ""), ("prepend", "")],
    )
    .await;
    assert_eq!(error_code(&body), "invalidparammix");

    let body = edit(&base, "Alice", &[("title", "Exists"), ("slot_data", "{broken")]).await;
    assert_eq!(error_code(&body), "invalidcontent");

    let body = edit(&base, "Alice", &[("title", "Exists"), ("slot_bogus", "z")]).await;
    assert_eq!(error_code(&body), "noslots");

    assert_eq!(store.revision_count().unwrap(), 1);
}

#[tokio::test]
async fn parameter_errors_are_reported() {
    let (base, _store) = spawn_test_server(test_config()).await;

    let body = edit(&base, "Alice", &[("slot_main", "x")]).await;
    assert_eq!(error_code(&body), "missingparam");

    let body = edit(&base, "Alice", &[("title", "A"), ("pageid", "1"), ("slot_main", "x")]).await;
    assert_eq!(error_code(&body), "invalidparammix");

    let body = edit(&base, "Alice", &[("title", "Bad[title]"), ("slot_main", "x")]).await;
    assert_eq!(error_code(&body), "invalidtitle");

    let body = edit(&base, "Alice", &[("pageid", "seven"), ("slot_main", "x")]).await;
    assert_eq!(error_code(&body), "badinteger");

    let body = edit(
        &base,
        "Alice",
        &[("title", "A"), ("slot_main", "x"), ("watchlist", "always")],
    )
    .await;
    assert_eq!(error_code(&body), "badvalue");
}

#[tokio::test]
async fn watchlist_parameter_is_applied() {
    let (base, store) = spawn_test_server(test_config()).await;
    let alice = ActorId::user("Alice");

    let body = edit(
        &base,
        "Alice",
        &[("title", "Watched"), ("slot_main", "x"), ("watchlist", "watch")],
    )
    .await;
    let page_id = wsslots_types::PageId::new(body["editslots"]["pageid"].as_u64().unwrap()).unwrap();
    assert!(store.is_watched(&alice, page_id).unwrap());

    edit(
        &base,
        "Alice",
        &[("title", "Watched"), ("slot_main", "y"), ("watchlist", "unwatch")],
    )
    .await;
    assert!(!store.is_watched(&alice, page_id).unwrap());
}

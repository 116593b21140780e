//! HTTP API for WSSlots.
//!
//! Serves the MediaWiki-style `/api.php` endpoint:
//! - `POST action=editslots` edits one or more slots of a page in a single
//!   revision, through [`wsslots_edit::SlotEditor`]
//! - `GET action=query&meta=tokens` hands out the caller's edit token
//!
//! Errors are answered as `{"error":{"code":..,"info":..}}`.

mod api;
pub mod config;
pub mod error;
pub mod params;
pub mod permissions;
pub mod tokens;

use axum::{Router, routing::get};
use std::sync::Arc;
use wsslots_model::{ContentStore, SlotRegistry, WatchService};
use wsslots_storage::RevisionStore;

pub use api::USER_HEADER;
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use permissions::{Action, ConfigPermissions, PermissionChecker, PermissionError};
pub use tokens::CsrfTokens;

/// Everything a request handler needs.
pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub watch: Arc<dyn WatchService>,
    pub registry: Arc<dyn SlotRegistry>,
    pub permissions: Arc<dyn PermissionChecker>,
    pub tokens: CsrfTokens,
}

impl AppState {
    /// Wires a DuckDB store, which doubles as the watch service, to the
    /// registry and permissions described by `config`.
    pub fn from_config(config: &Config, store: RevisionStore, secret: &str) -> Self {
        Self {
            store: Arc::new(store.clone()),
            watch: Arc::new(store),
            registry: Arc::new(config.registry()),
            permissions: Arc::new(ConfigPermissions::new(config.permissions.clone())),
            tokens: CsrfTokens::new(secret),
        }
    }
}

/// Build the HTTP API router with the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api.php", get(api::api_get).post(api::api_post))
        .with_state(state)
}

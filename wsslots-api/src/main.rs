//! WSSlots API server.
//!
//! Serves `/api.php` with the slot-aware `editslots` action over a DuckDB
//! revision store.
//!
//! Usage:
//!   wsslots-api --config wsslots.toml
//!   wsslots-api --database :memory: --listen 127.0.0.1:8080

use anyhow::{Context, Result};
use clap::Parser;
use std::{path::PathBuf, sync::Arc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wsslots_api::{AppState, Config, build_router};
use wsslots_model::SlotRegistry;
use wsslots_storage::RevisionStore;

/// Value of `[storage] path` that selects a throwaway in-memory store.
const IN_MEMORY: &str = ":memory:";

#[derive(Parser, Debug)]
#[command(name = "wsslots-api")]
#[command(about = "Slot-aware page editing API")]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the config
    #[arg(short, long)]
    listen: Option<String>,

    /// DuckDB file (or :memory:), overriding the config
    #[arg(short, long)]
    database: Option<String>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .compact()
        .init();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(database) = args.database {
        config.storage.path = database;
    }

    let store = if config.storage.path == IN_MEMORY {
        warn!("Using an in-memory store; edits are lost on shutdown");
        RevisionStore::open_in_memory().context("Failed to open in-memory store")?
    } else {
        let path = PathBuf::from(&config.storage.path);
        info!("Opening revision store at {}", path.display());
        RevisionStore::open(&path).context("Failed to open revision store")?
    };

    let secret = if config.tokens.secret.is_empty() {
        warn!("No [tokens] secret configured; edit tokens will not survive a restart");
        uuid::Uuid::new_v4().to_string()
    } else {
        config.tokens.secret.clone()
    };

    let roles: Vec<String> = config
        .registry()
        .known_roles()
        .into_iter()
        .map(|role| role.to_string())
        .collect();
    info!("Known slot roles: {}", roles.join(", "));

    let state = Arc::new(AppState::from_config(&config, store, &secret));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.server.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen))?;
    info!("WSSlots API listening on http://{}/api.php", listener.local_addr()?);
    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}

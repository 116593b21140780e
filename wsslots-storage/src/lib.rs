//! DuckDB storage layer for WSSlots.
//!
//! Provides persistent page, revision and watchlist storage behind the
//! [`ContentStore`](wsslots_model::ContentStore) and
//! [`WatchService`](wsslots_model::WatchService) contracts.
//!
//! # Architecture
//!
//! - Pages point at their latest revision; revisions are append-only
//! - Every slot of a revision is its own row, keyed by `(rev_id, role)`
//! - A revision write is one transaction guarded by a base-revision check
//! - The schema is created on open

mod error;
mod revision_store;
mod schema;

pub use error::{StorageError, StorageResult};
pub use revision_store::RevisionStore;

use duckdb::Connection;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Opens the revision database file behind [`RevisionStore::open`].
///
/// A server killed mid-write can leave a `.wal` file that stops the database
/// from reopening. When the first open fails and such a file exists, it is
/// deleted and the open is retried once, so the API can restart on the same
/// file. Failing to delete the WAL is reported as [`StorageError::Io`].
pub fn open_duckdb_with_wal_recovery(path: &Path) -> StorageResult<Connection> {
    let first_err = match Connection::open(path) {
        Ok(conn) => return Ok(conn),
        Err(e) => e,
    };

    let wal_path = wal_path_for(path);
    if !wal_path.exists() {
        return Err(first_err.into());
    }
    warn!(
        "Opening {} failed ({}); removing stale WAL {} and retrying",
        path.display(),
        first_err,
        wal_path.display()
    );
    std::fs::remove_file(&wal_path)?;
    Ok(Connection::open(path)?)
}

/// `pages.duckdb` -> `pages.duckdb.wal`, `pages` -> `pages.wal`.
fn wal_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".wal");
    PathBuf::from(name)
}

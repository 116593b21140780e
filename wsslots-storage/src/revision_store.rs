//! Page, revision and watchlist persistence on a single DuckDB connection.

use crate::{schema, StorageError, StorageResult};
use chrono::{DateTime, Utc};
use duckdb::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use wsslots_model::{ContentStore, StoreError, StoreResult, WatchService};
use wsslots_types::{
    ActorId, ContentModel, Page, PageId, Revision, RevisionId, RevisionMeta, Slot, SlotRole,
    Title, WatchPreferences,
};

/// DuckDB-backed [`ContentStore`] and [`WatchService`].
///
/// The connection is shared behind a mutex, so one store serializes all of
/// its reads and writes. Cloning is cheap and shares the connection.
#[derive(Clone)]
pub struct RevisionStore {
    conn: Arc<Mutex<Connection>>,
}

impl RevisionStore {
    /// Opens (or creates) a database file.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = crate::open_duckdb_with_wal_recovery(path)?;
        Self::with_connection(Arc::new(Mutex::new(conn)))
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(Arc::new(Mutex::new(conn)))
    }

    /// Wraps an existing connection, creating the schema if needed.
    pub fn with_connection(conn: Arc<Mutex<Connection>>) -> StorageResult<Self> {
        {
            let guard = conn.lock().map_err(|_| StorageError::LockPoisoned)?;
            schema::initialize(&guard)?;
        }
        Ok(Self { conn })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Number of stored revisions across all pages.
    pub fn revision_count(&self) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM revisions", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn insert_revision(
        &self,
        page: &Page,
        base: Option<RevisionId>,
        mut slots: Vec<Slot>,
        meta: RevisionMeta,
    ) -> StorageResult<Revision> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let existing = page_row_by_title(&tx, &page.title)?;
        let actual = match &existing {
            Some((_, latest)) => Some(parse_rev_id(latest)?),
            None => None,
        };
        if actual != base {
            let rejected = match (base, actual) {
                (None, Some(_)) => StoreError::PageExists(page.title.clone()),
                _ => StoreError::EditConflict {
                    title: page.title.clone(),
                    expected: base,
                    actual,
                },
            };
            return Err(rejected.into());
        }

        let page_id = match &existing {
            Some((id, _)) => *id,
            None => tx.query_row(
                "SELECT COALESCE(MAX(page_id), 0) + 1 FROM pages",
                [],
                |row| row.get::<_, i64>(0),
            )?,
        };
        let seq: i64 = tx.query_row(
            "SELECT COUNT(*) FROM revisions WHERE page_id = ?",
            params![page_id],
            |row| row.get(0),
        )?;

        let rev_id = RevisionId::new();
        let rev_key = rev_id.to_string();

        if existing.is_some() {
            tx.execute(
                "UPDATE pages SET latest_rev = ? WHERE page_id = ?",
                params![rev_key, page_id],
            )?;
        } else {
            tx.execute(
                "INSERT INTO pages (page_id, title, latest_rev) VALUES (?, ?, ?)",
                params![page_id, page.title.as_str(), rev_key],
            )?;
        }

        tx.execute(
            "INSERT INTO revisions (rev_id, page_id, seq, parent_id, actor, summary, minor, bot, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                rev_key,
                page_id,
                seq + 1,
                base.map(|b| b.to_string()),
                meta.actor.key(),
                meta.summary,
                meta.minor,
                meta.bot,
                meta.timestamp.to_rfc3339(),
            ],
        )?;

        slots.sort_by(|a, b| a.role.cmp(&b.role));
        for slot in &slots {
            tx.execute(
                "INSERT INTO slots (rev_id, role, model, content) VALUES (?, ?, ?, ?)",
                params![rev_key, slot.role.as_str(), slot.model.as_str(), slot.content],
            )?;
        }

        tx.commit()?;
        debug!(
            "Stored revision {} of \"{}\" ({} slots)",
            rev_id,
            page.title,
            slots.len()
        );

        Ok(Revision {
            id: rev_id,
            page_id: to_page_id(page_id)?,
            parent: base,
            meta,
            slots,
        })
    }
}

// ── Row helpers ──────────────────────────────────────────────────

fn parse_rev_id(raw: &str) -> StorageResult<RevisionId> {
    RevisionId::parse(raw).map_err(|e| StorageError::InvalidData(format!("revision id {raw}: {e}")))
}

fn to_page_id(raw: i64) -> StorageResult<PageId> {
    Ok(PageId::new(raw as u64)?)
}

fn page_row_by_title(conn: &Connection, title: &Title) -> StorageResult<Option<(i64, String)>> {
    let mut stmt = conn.prepare("SELECT page_id, latest_rev FROM pages WHERE title = ?")?;
    let mut rows = stmt.query_map(params![title.as_str()], |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
    })?;
    Ok(rows.next().transpose()?)
}

fn page_row_by_id(conn: &Connection, id: PageId) -> StorageResult<Option<(String, String)>> {
    let mut stmt = conn.prepare("SELECT title, latest_rev FROM pages WHERE page_id = ?")?;
    let mut rows = stmt.query_map(params![id.get() as i64], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
    })?;
    Ok(rows.next().transpose()?)
}

struct RevisionRow {
    page_id: i64,
    parent: Option<String>,
    actor: String,
    summary: String,
    minor: bool,
    bot: bool,
    created_at: String,
}

fn load_slots(conn: &Connection, rev_key: &str) -> StorageResult<Vec<Slot>> {
    let mut stmt =
        conn.prepare("SELECT role, model, content FROM slots WHERE rev_id = ? ORDER BY role")?;
    let rows = stmt.query_map(params![rev_key], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut slots = Vec::new();
    for row in rows {
        let (role, model, content) = row?;
        slots.push(Slot {
            role: SlotRole::new(&role)?,
            model: model.parse::<ContentModel>()?,
            content,
        });
    }
    Ok(slots)
}

fn load_revision(conn: &Connection, rev_key: &str) -> StorageResult<Option<Revision>> {
    let mut stmt = conn.prepare(
        "SELECT page_id, parent_id, actor, summary, minor, bot, created_at
         FROM revisions WHERE rev_id = ?",
    )?;
    let mut rows = stmt.query_map(params![rev_key], |row| {
        Ok(RevisionRow {
            page_id: row.get(0)?,
            parent: row.get(1)?,
            actor: row.get(2)?,
            summary: row.get(3)?,
            minor: row.get(4)?,
            bot: row.get(5)?,
            created_at: row.get(6)?,
        })
    })?;
    let Some(row) = rows.next().transpose()? else {
        return Ok(None);
    };

    let timestamp = DateTime::parse_from_rfc3339(&row.created_at)
        .map_err(|e| StorageError::InvalidData(format!("timestamp {}: {e}", row.created_at)))?
        .with_timezone(&Utc);

    Ok(Some(Revision {
        id: parse_rev_id(rev_key)?,
        page_id: to_page_id(row.page_id)?,
        parent: row.parent.as_deref().map(parse_rev_id).transpose()?,
        meta: RevisionMeta {
            actor: ActorId::user(row.actor),
            summary: row.summary,
            minor: row.minor,
            bot: row.bot,
            timestamp,
        },
        slots: load_slots(conn, rev_key)?,
    }))
}

/// Every revision of a page, oldest first.
fn load_history(conn: &Connection, page_id: i64) -> StorageResult<Vec<Revision>> {
    let keys = {
        let mut stmt = conn.prepare("SELECT rev_id FROM revisions WHERE page_id = ? ORDER BY seq")?;
        let rows = stmt.query_map(params![page_id], |row| row.get::<_, String>(0))?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    let mut revisions = Vec::with_capacity(keys.len());
    for key in keys {
        if let Some(rev) = load_revision(conn, &key)? {
            revisions.push(rev);
        }
    }
    Ok(revisions)
}

// ── ContentStore ─────────────────────────────────────────────────

impl ContentStore for RevisionStore {
    fn page_by_title(&self, title: &Title) -> StoreResult<Page> {
        let conn = self.lock()?;
        let page = match page_row_by_title(&conn, title)? {
            Some((id, latest)) => Page {
                id: Some(to_page_id(id)?),
                title: title.clone(),
                latest: Some(parse_rev_id(&latest)?),
            },
            None => Page::missing(title.clone()),
        };
        Ok(page)
    }

    fn page_by_id(&self, id: PageId) -> StoreResult<Option<Page>> {
        let conn = self.lock()?;
        let Some((title, latest)) = page_row_by_id(&conn, id)? else {
            return Ok(None);
        };
        let title = Title::new(&title).map_err(StorageError::from)?;
        Ok(Some(Page {
            id: Some(id),
            title,
            latest: Some(parse_rev_id(&latest)?),
        }))
    }

    fn latest_revision(&self, page: &Page) -> StoreResult<Option<Revision>> {
        let conn = self.lock()?;
        let Some((_, latest)) = page_row_by_title(&conn, &page.title)? else {
            return Ok(None);
        };
        Ok(load_revision(&conn, &latest)?)
    }

    fn create_revision(
        &self,
        page: &Page,
        base: Option<RevisionId>,
        slots: Vec<Slot>,
        meta: RevisionMeta,
    ) -> StoreResult<Revision> {
        Ok(self.insert_revision(page, base, slots, meta)?)
    }

    fn revisions(&self, page: &Page) -> StoreResult<Vec<Revision>> {
        let conn = self.lock()?;
        let Some((page_id, _)) = page_row_by_title(&conn, &page.title)? else {
            return Ok(Vec::new());
        };

        Ok(load_history(&conn, page_id)?)
    }
}

// ── WatchService ─────────────────────────────────────────────────

impl WatchService for RevisionStore {
    fn is_watched(&self, actor: &ActorId, page: PageId) -> StoreResult<bool> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM watchlist WHERE actor = ? AND page_id = ?",
                params![actor.key(), page.get() as i64],
                |row| row.get(0),
            )
            .map_err(StorageError::from)?;
        Ok(count > 0)
    }

    fn watch(&self, actor: &ActorId, page: PageId) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR IGNORE INTO watchlist (actor, page_id) VALUES (?, ?)",
            params![actor.key(), page.get() as i64],
        )
        .map_err(StorageError::from)?;
        debug!("{} now watches page {}", actor, page);
        Ok(())
    }

    fn unwatch(&self, actor: &ActorId, page: PageId) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM watchlist WHERE actor = ? AND page_id = ?",
            params![actor.key(), page.get() as i64],
        )
        .map_err(StorageError::from)?;
        debug!("{} no longer watches page {}", actor, page);
        Ok(())
    }

    fn preferences(&self, actor: &ActorId) -> StoreResult<WatchPreferences> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT watch_edits, watch_creations FROM watch_prefs WHERE actor = ?")
            .map_err(StorageError::from)?;
        let mut rows = stmt
            .query_map(params![actor.key()], |row| {
                Ok(WatchPreferences {
                    watch_edits: row.get(0)?,
                    watch_creations: row.get(1)?,
                })
            })
            .map_err(StorageError::from)?;
        let prefs = rows.next().transpose().map_err(StorageError::from)?;
        Ok(prefs.unwrap_or_default())
    }

    fn set_preferences(&self, actor: &ActorId, prefs: WatchPreferences) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO watch_prefs (actor, watch_edits, watch_creations) VALUES (?, ?, ?)",
            params![actor.key(), prefs.watch_edits, prefs.watch_creations],
        )
        .map_err(StorageError::from)?;
        Ok(())
    }
}

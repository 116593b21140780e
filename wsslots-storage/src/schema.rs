use crate::StorageResult;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS pages (
    page_id BIGINT PRIMARY KEY,
    title VARCHAR NOT NULL UNIQUE,
    latest_rev VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS revisions (
    rev_id VARCHAR PRIMARY KEY,
    page_id BIGINT NOT NULL,
    seq BIGINT NOT NULL,
    parent_id VARCHAR,
    actor VARCHAR NOT NULL,
    summary VARCHAR NOT NULL,
    minor BOOLEAN NOT NULL,
    bot BOOLEAN NOT NULL,
    created_at VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS slots (
    rev_id VARCHAR NOT NULL,
    role VARCHAR NOT NULL,
    model VARCHAR NOT NULL,
    content VARCHAR NOT NULL,
    PRIMARY KEY (rev_id, role)
);

CREATE TABLE IF NOT EXISTS watchlist (
    actor VARCHAR NOT NULL,
    page_id BIGINT NOT NULL,
    PRIMARY KEY (actor, page_id)
);

CREATE TABLE IF NOT EXISTS watch_prefs (
    actor VARCHAR PRIMARY KEY,
    watch_edits BOOLEAN NOT NULL,
    watch_creations BOOLEAN NOT NULL
);
"#;

/// Creates every table that does not exist yet.
pub(crate) fn initialize(conn: &duckdb::Connection) -> StorageResult<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

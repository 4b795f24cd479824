//! Database schema migrations for revise.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const CURRENT_SCHEMA_VERSION: i32 = 3;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }
    if current_version < 3 {
        migrate_v3(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!("failed to read schema_version: {e}");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: reviews, manual events and the key-value table.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS reviews (
            id              TEXT PRIMARY KEY,
            topic_id        TEXT NOT NULL,
            subject         TEXT NOT NULL,
            chapter         TEXT NOT NULL DEFAULT '',
            topic           TEXT NOT NULL DEFAULT '',
            difficulty      TEXT NOT NULL,
            interval        INTEGER NOT NULL DEFAULT 0,
            due_date        TEXT NOT NULL,
            last_reviewed   TEXT,
            times_reviewed  INTEGER NOT NULL DEFAULT 0,
            is_completed    INTEGER NOT NULL DEFAULT 0,
            notes           TEXT,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS events (
            id          TEXT PRIMARY KEY,
            title       TEXT NOT NULL,
            date        TEXT NOT NULL,
            time        TEXT NOT NULL DEFAULT '09:00',
            event_type  TEXT NOT NULL,
            description TEXT,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS kv (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;
    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: indexes for the queue and forecast queries.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_reviews_due_date ON reviews(due_date);
         CREATE INDEX IF NOT EXISTS idx_reviews_topic_id ON reviews(topic_id);
         CREATE INDEX IF NOT EXISTS idx_events_date ON events(date);",
    )?;
    set_schema_version(&tx, 2)?;
    tx.commit()
}

/// Migration v3: practice test sessions and syllabus coverage marks.
fn migrate_v3(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS test_sessions (
            id               TEXT PRIMARY KEY,
            date             TEXT NOT NULL,
            duration         INTEGER NOT NULL DEFAULT 0,
            total_questions  INTEGER NOT NULL,
            correct_answers  INTEGER NOT NULL,
            subject          TEXT,
            chapter          TEXT,
            topics           TEXT NOT NULL DEFAULT '[]',
            score            INTEGER NOT NULL,
            created_at       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS coverage (
            topic_id    TEXT PRIMARY KEY,
            subject     TEXT NOT NULL,
            chapter     TEXT NOT NULL DEFAULT '',
            topic       TEXT NOT NULL DEFAULT '',
            state       TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_test_sessions_date ON test_sessions(date);",
    )?;
    set_schema_version(&tx, 3)?;
    tx.commit()
}

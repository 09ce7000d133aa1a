//! Schema migrations for the timemark SQLite database.
//!
//! Uses a `schema_version` table to track which migrations have been applied.
//! Each migration runs exactly once and is recorded with a timestamp.

use rusqlite::Connection;

/// Current schema version. Bump this when adding a new migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Returns the current schema version from the database (0 if table doesn't exist).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending schema migrations against the provided connection.
///
/// Migrations are versioned — each runs exactly once and is recorded in the
/// `schema_version` table. Safe to call on every open, including against a
/// database that already holds records.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    // Enable WAL (always, not versioned)
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        log::info!("applying schema migration v1 (current v{})", current);
        migration_v1(conn)?;
        record_version(conn, 1, "Initial schema: bookmarks table and indexes")?;
    }

    Ok(())
}

fn record_version(
    conn: &Connection,
    version: i32,
    description: &str,
) -> Result<(), rusqlite::Error> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, now, description],
    )?;
    Ok(())
}

/// V1: The bookmarks table keyed by an auto-assigned integer id, with
/// non-unique secondary indexes on subject id, time and added-at.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS bookmarks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_id TEXT NOT NULL,
            subject_title TEXT,
            time INTEGER NOT NULL DEFAULT 0,
            time_label TEXT,
            note TEXT,
            subtitle TEXT,
            tags TEXT NOT NULL DEFAULT '[]',
            color TEXT,
            added_at INTEGER NOT NULL DEFAULT 0,
            image_data TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_bookmarks_subject_id ON bookmarks(subject_id);
        CREATE INDEX IF NOT EXISTS idx_bookmarks_time ON bookmarks(time);
        CREATE INDEX IF NOT EXISTS idx_bookmarks_added_at ON bookmarks(added_at);
        ",
    )
}

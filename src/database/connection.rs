//! SQLite database connection management for the bookmark store.
//!
//! Provides the [`Database`] struct that wraps a `rusqlite::Connection`
//! and automatically runs schema migrations on open.

use rusqlite::Connection;
use std::path::Path;

use super::migrations;
use crate::types::errors::StoreError;

/// Core database wrapper providing SQLite connection management.
///
/// The `Database` owns one `rusqlite::Connection` which is opened lazily by the
/// application, held for its lifetime, and shared by all store instances. It
/// ensures the bookmarks table and its secondary indexes exist when opened.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) a SQLite database at the given file path and runs
    /// migrations.
    ///
    /// # Errors
    /// Returns [`StoreError::StorageUnavailable`] when the file is held by
    /// another open handle (SQLite busy/locked), or another `StoreError`
    /// variant for any other engine failure.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        log::debug!("opening bookmark database at {}", path.as_ref().display());
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Opens an in-memory SQLite database and runs migrations.
    ///
    /// Useful for testing — the database is discarded when the `Database` is
    /// dropped.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Runs all pending schema migrations. Idempotent, safe on every open.
    fn run_migrations(&self) -> Result<(), StoreError> {
        migrations::run_all(&self.conn)?;
        Ok(())
    }

    /// Returns a reference to the underlying `rusqlite::Connection`, from which
    /// store instances are created on demand.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

//! App core for timemark.
//!
//! Holds the single lazily-opened, shared database handle. The store itself is
//! created on demand via `db.connection()` because it borrows the connection
//! with a lifetime parameter — see `BookmarkStore::new(app.db.connection())`.

use std::sync::Arc;

use crate::database::Database;
use crate::types::errors::StoreError;

/// Central application struct owning the shared [`Database`] handle.
pub struct App {
    pub db: Arc<Database>,
}

impl App {
    /// Opens (or creates) the bookmark database at `db_path` and runs
    /// migrations once, instead of re-opening the resource on every operation.
    pub fn new(db_path: &str) -> Result<Self, StoreError> {
        let db = Arc::new(Database::open(db_path)?);
        Ok(Self { db })
    }

    /// App backed by an in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let db = Arc::new(Database::open_in_memory()?);
        Ok(Self { db })
    }
}

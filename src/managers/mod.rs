//! Database-backed managers.
//!
//! `BookmarkStore` borrows the shared connection with a lifetime parameter and
//! is created on demand via `db.connection()`.

pub mod bookmark_store;

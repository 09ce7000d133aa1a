//! Database layer for the timemark bookmark store.
//!
//! This module provides:
//! - `connection`: SQLite connection management via the [`Database`] struct
//! - `migrations`: versioned, idempotent schema migrations
//!
//! # Example
//! ```no_run
//! use timemark::database::Database;
//!
//! let db = Database::open("timemark.db").expect("Failed to open database");
//! let conn = db.connection();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;

//! timemark — durable store and query engine for timestamped video bookmarks.
//!
//! This library crate exposes all modules for use by the binary and integration
//! tests: the SQLite-backed bookmark store, the pure grouped-view engine, the
//! JSON interchange codec and the command router.

pub mod app;
pub mod command_router;
pub mod database;
pub mod managers;
pub mod services;
pub mod types;

//! Core data types for the timemark bookmark store.

pub mod bookmark;
pub mod errors;
pub mod view;

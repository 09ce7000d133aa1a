//! Stateless services: the pure view engine and the JSON interchange codec.

pub mod interchange;
pub mod view_engine;

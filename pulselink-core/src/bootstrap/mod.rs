//! Bootstrap helpers for the server binary
//!
//! Handles configuration loading and database pool initialization.

pub mod config;
pub mod database;

pub use config::load_config;
pub use database::init_database;

//! # Inkwell Infrastructure
//!
//! MySQL-backed implementations of the core repository interfaces,
//! plus connection pool construction.

pub mod database;

pub use database::connection::create_pool;
pub use database::mysql::{MySqlTokenRepository, MySqlUserDirectory};

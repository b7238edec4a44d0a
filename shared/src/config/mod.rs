//! Configuration module with business-specific sub-modules
//!
//! - `auth` - JWT and token-reaper configuration
//! - `database` - Database connection and pool configuration
//! - `server` - HTTP server configuration

pub mod auth;
pub mod database;
pub mod server;

pub use auth::{JwtConfig, ReaperConfig};
pub use database::DatabaseConfig;
pub use server::ServerConfig;

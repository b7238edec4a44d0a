//! # Inkwell Shared
//!
//! Cross-cutting types shared by the Inkwell backend crates:
//! configuration structs, the API response envelope, and small
//! validation utilities.

pub mod config;
pub mod types;
pub mod utils;

pub use config::{DatabaseConfig, JwtConfig, ReaperConfig, ServerConfig};
pub use types::response::ErrorResponse;

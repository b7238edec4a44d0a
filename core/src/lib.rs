//! # Inkwell Core
//!
//! Core business logic and domain layer for the Inkwell backend.
//! This crate contains the session and refresh-token lifecycle: domain
//! entities, the refresh coordinator, repository interfaces, the token
//! issuer, and the expired-token reaper.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;

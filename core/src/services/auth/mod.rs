//! Authentication service module
//!
//! Orchestrates the session and refresh-token lifecycle:
//! - Login: credential verification and all-or-nothing token issuance
//! - Refresh: atomic rotation of refresh secrets with replay detection
//! - Logout: bulk revocation of a user's active refresh tokens

mod service;

#[cfg(test)]
mod tests;

pub use service::AuthService;

//! # Inkwell client
//!
//! HTTP client for the Inkwell API. The [`SessionGuard`] keeps the
//! token pair and renews it transparently when a request comes back
//! 401: concurrent callers that hit the same expiry share a single
//! refresh call instead of racing the rotation endpoint.

pub mod api;
pub mod error;
pub mod session;
pub mod transport;

pub use api::ApiClient;
pub use error::ClientError;
pub use session::SessionGuard;
pub use transport::{RefreshTransport, SessionTokens};

//! Refresh transport seam
//!
//! The session guard talks to the rotation endpoint through this trait
//! so tests can drive it with an in-memory fake.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// A token pair as held by the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    /// Signed JWT presented as the bearer token
    pub access_token: String,

    /// Opaque refresh secret, usable exactly once
    pub refresh_token: String,
}

impl SessionTokens {
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

/// Exchanges a refresh secret for a new token pair
#[async_trait]
pub trait RefreshTransport: Send + Sync {
    /// Call the rotation endpoint with the given secret
    ///
    /// Implementations map an authentication rejection to
    /// [`ClientError::SessionExpired`] and transport failures to
    /// [`ClientError::Network`].
    async fn refresh(&self, refresh_token: &str) -> Result<SessionTokens, ClientError>;
}

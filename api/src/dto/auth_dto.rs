//! Authentication DTOs
//!
//! Wire names are camelCase; authentication outcomes always travel in
//! the structured `AuthResponse` envelope with a success flag and a
//! list of human-readable error messages.

use serde::{Deserialize, Serialize};
use validator::Validate;

use iw_core::domain::entities::token::TokenPair;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl AuthResponse {
    /// Successful envelope carrying a token pair
    pub fn from_pair(pair: TokenPair) -> Self {
        Self {
            success: true,
            access_token: Some(pair.access_token),
            refresh_token: Some(pair.refresh_token),
            expires_in: Some(pair.access_expires_in),
            errors: Vec::new(),
        }
    }

    /// Failed envelope carrying error messages
    pub fn failure(errors: Vec<String>) -> Self {
        Self {
            success: false,
            access_token: None,
            refresh_token: None,
            expires_in: None,
            errors,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub success: bool,
}

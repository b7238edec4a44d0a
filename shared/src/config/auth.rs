//! Authentication and token lifecycle configuration

use serde::{Deserialize, Serialize};

const DEFAULT_SECRET: &str = "change-me-in-production";

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT secret key for signing access tokens
    pub secret: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_SECRET),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            issuer: String::from("inkwell"),
            audience: String::from("inkwell-api"),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Load the configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            config.secret = secret;
        }
        if let Some(seconds) = env_i64("JWT_ACCESS_TOKEN_EXPIRY") {
            config.access_token_expiry = seconds;
        }
        if let Some(seconds) = env_i64("JWT_REFRESH_TOKEN_EXPIRY") {
            config.refresh_token_expiry = seconds;
        }
        config
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if the default secret is still in use (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_SECRET
    }
}

/// Expired refresh-token reaper configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReaperConfig {
    /// How often to sweep expired rows (in seconds)
    pub interval_seconds: u64,

    /// Whether the background sweep is enabled
    pub enabled: bool,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 86400, // daily
            enabled: true,
        }
    }
}

impl ReaperConfig {
    /// Load the configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(seconds) = env_i64("REAPER_INTERVAL_SECONDS") {
            if seconds > 0 {
                config.interval_seconds = seconds as u64;
            }
        }
        if let Ok(enabled) = std::env::var("REAPER_ENABLED") {
            config.enabled = enabled != "false" && enabled != "0";
        }
        config
    }
}

fn env_i64(key: &str) -> Option<i64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

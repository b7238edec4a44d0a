//! API response types and wrappers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured error payload returned by the API
///
/// Authentication outcomes are always reported through a structured
/// body rather than an unstructured error crossing the API boundary;
/// `errors` carries zero or more human-readable messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Whether the request was successful (always `false` here)
    pub success: bool,

    /// Error code for programmatic handling
    pub error: String,

    /// Human-readable error messages
    pub errors: Vec<String>,

    /// Response timestamp
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response with a single message
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            errors: vec![message.into()],
            timestamp: Utc::now(),
        }
    }

    /// Append an additional message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.errors.push(message.into());
        self
    }
}

//! Client-side error types

use thiserror::Error;

/// Errors surfaced by the Inkwell API client
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The request never received an HTTP response
    ///
    /// Network failures are reported as-is and never terminate the
    /// session; the stored tokens stay usable for a later retry.
    #[error("network error: {0}")]
    Network(String),

    /// The server no longer accepts this session's tokens
    #[error("session expired, authentication required")]
    SessionExpired,

    /// The server rejected the request with an error body
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response body did not match the expected shape
    #[error("malformed server response: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

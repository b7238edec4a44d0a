//! Domain-specific error types and error handling.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email address is not confirmed")]
    EmailNotConfirmed,

    #[error("User not found")]
    UserNotFound,

    /// Fail-closed mapping for persistence failures during issuance:
    /// no access token is ever handed out for a session that cannot
    /// later be revoked server-side.
    #[error("Authentication failed")]
    AuthenticationFailed,
}

/// Token-related errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Covers never-issued, expired, revoked, and verifier-mismatch
    /// secrets. Deliberately undifferentiated so callers cannot
    /// enumerate which condition they hit.
    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    /// An already-rotated secret was presented again, implying the
    /// secret leaked. Rendered identically to `InvalidRefreshToken` at
    /// the API boundary.
    #[error("Invalid refresh token")]
    ReplayDetected,

    /// Lookup-hash collision on insert; the caller regenerates the
    /// secret and retries once.
    #[error("Duplicate refresh token lookup hash")]
    DuplicateLookupHash,

    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token format")]
    InvalidTokenFormat,
}

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_and_replayed_tokens_render_identically() {
        // Anti-enumeration: the two failure modes must be
        // indistinguishable in any user-facing message.
        assert_eq!(
            TokenError::InvalidRefreshToken.to_string(),
            TokenError::ReplayDetected.to_string(),
        );
    }

    #[test]
    fn domain_error_bridges_token_errors() {
        let err: DomainError = TokenError::InvalidRefreshToken.into();
        assert!(matches!(
            err,
            DomainError::Token(TokenError::InvalidRefreshToken)
        ));
    }
}

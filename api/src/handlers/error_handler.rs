//! Maps domain errors to HTTP responses
//!
//! Every authentication outcome is rendered through the structured
//! `AuthResponse` envelope. Invalid-token conditions are deliberately
//! collapsed: never-issued, expired, revoked, verifier-mismatch, and
//! replayed secrets all produce the same 401 body.

use actix_web::HttpResponse;
use tracing::error;

use iw_core::errors::{AuthError, DomainError, TokenError};

use crate::dto::AuthResponse;

/// Translate a domain error into an HTTP response
pub fn handle_domain_error(err: &DomainError) -> HttpResponse {
    match err {
        DomainError::Auth(auth) => match auth {
            AuthError::InvalidCredentials
            | AuthError::EmailNotConfirmed
            | AuthError::UserNotFound
            | AuthError::AuthenticationFailed => {
                HttpResponse::Unauthorized().json(AuthResponse::failure(vec![auth.to_string()]))
            }
        },
        DomainError::Token(token) => match token {
            // Both variants display as "Invalid refresh token".
            TokenError::InvalidRefreshToken | TokenError::ReplayDetected => {
                HttpResponse::Unauthorized()
                    .json(AuthResponse::failure(vec![token.to_string()]))
            }
            TokenError::TokenExpired | TokenError::InvalidTokenFormat => {
                HttpResponse::Unauthorized()
                    .json(AuthResponse::failure(vec![token.to_string()]))
            }
            TokenError::DuplicateLookupHash | TokenError::TokenGenerationFailed => {
                internal_error(err)
            }
        },
        DomainError::Validation { message } => {
            HttpResponse::BadRequest().json(AuthResponse::failure(vec![message.clone()]))
        }
        DomainError::Internal { .. } => internal_error(err),
    }
}

fn internal_error(err: &DomainError) -> HttpResponse {
    // Details stay in the logs; the body never leaks internal state.
    error!("internal error handling auth request: {err}");
    HttpResponse::InternalServerError()
        .json(AuthResponse::failure(vec!["An internal error occurred".to_string()]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_and_replayed_tokens_map_to_the_same_response() {
        let invalid = handle_domain_error(&TokenError::InvalidRefreshToken.into());
        let replayed = handle_domain_error(&TokenError::ReplayDetected.into());
        assert_eq!(invalid.status(), replayed.status());
        assert_eq!(invalid.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let response = handle_domain_error(&DomainError::Internal {
            message: "connection pool exhausted".to_string(),
        });
        assert_eq!(
            response.status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

//! Authentication route handlers
//!
//! This module contains all authentication-related endpoints:
//! - Login with email and password
//! - Token refresh (rotation)
//! - Logout

use std::sync::Arc;

use actix_web::HttpRequest;

use iw_core::{
    domain::entities::token::ClientMeta,
    repositories::{TokenRepository, UserDirectory},
    services::{auth::AuthService, token::TokenIssuer},
};

pub mod login;
pub mod logout;
pub mod refresh;

/// Shared application state for the authentication endpoints
pub struct AppState<U, T>
where
    U: UserDirectory + 'static,
    T: TokenRepository + 'static,
{
    pub auth_service: Arc<AuthService<U, T>>,
    pub issuer: Arc<TokenIssuer>,
}

impl<U, T> AppState<U, T>
where
    U: UserDirectory + 'static,
    T: TokenRepository + 'static,
{
    pub fn new(auth_service: Arc<AuthService<U, T>>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            auth_service,
            issuer,
        }
    }
}

/// Captures client metadata from the incoming request
///
/// The IP comes from the peer address; clients may tag the session with
/// an `X-Device-Id` header, which survives token rotation server-side.
pub fn client_meta(req: &HttpRequest) -> ClientMeta {
    let ip = req
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let device_id = req
        .headers()
        .get("X-Device-Id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    ClientMeta { ip, device_id }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn device_id_header_is_optional() {
        let req = TestRequest::default().to_http_request();
        let meta = client_meta(&req);
        assert!(meta.device_id.is_none());

        let req = TestRequest::default()
            .insert_header(("X-Device-Id", "tablet-7"))
            .to_http_request();
        let meta = client_meta(&req);
        assert_eq!(meta.device_id.as_deref(), Some("tablet-7"));
    }

    #[test]
    fn empty_device_id_header_is_ignored() {
        let req = TestRequest::default()
            .insert_header(("X-Device-Id", ""))
            .to_http_request();
        assert!(client_meta(&req).device_id.is_none());
    }
}

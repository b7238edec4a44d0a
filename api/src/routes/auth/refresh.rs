use actix_web::{web, HttpRequest, HttpResponse};

use iw_core::repositories::{TokenRepository, UserDirectory};

use crate::dto::{AuthResponse, RefreshTokenRequest};
use crate::handlers::handle_domain_error;

use super::{client_meta, AppState};

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new token pair. The presented token
/// is consumed: it is revoked and linked to its replacement.
///
/// # Request Body
///
/// ```json
/// {
///     "refreshToken": "string"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "accessToken": "eyJ...",
///     "refreshToken": "new secret",
///     "expiresIn": 900
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: the body is always
///   `{"success": false, "errors": ["Invalid refresh token"]}` whatever
///   the underlying reason (unknown, expired, revoked, or replayed)
pub async fn refresh_token<U, T>(
    req: HttpRequest,
    state: web::Data<AppState<U, T>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: UserDirectory + 'static,
    T: TokenRepository + 'static,
{
    let meta = client_meta(&req);

    match state
        .auth_service
        .refresh(&request.refresh_token, &meta)
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(AuthResponse::from_pair(pair)),
        Err(error) => handle_domain_error(&error),
    }
}

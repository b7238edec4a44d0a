use actix_web::{web, HttpRequest, HttpResponse};

use iw_core::repositories::{TokenRepository, UserDirectory};

use crate::dto::LogoutResponse;
use crate::handlers::handle_domain_error;
use crate::middleware::auth::AuthContext;

use super::{client_meta, AppState};

/// Handler for POST /api/v1/auth/logout
///
/// Revokes every active refresh token belonging to the authenticated
/// user. Requires a Bearer access token in the Authorization header.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true
/// }
/// ```
///
/// Logout is idempotent: it succeeds even when the user has no active
/// tokens left.
///
/// ## Errors
/// - 401 Unauthorized: Missing or invalid access token
pub async fn logout<U, T>(
    req: HttpRequest,
    state: web::Data<AppState<U, T>>,
    auth: AuthContext,
) -> HttpResponse
where
    U: UserDirectory + 'static,
    T: TokenRepository + 'static,
{
    let meta = client_meta(&req);

    match state.auth_service.logout(auth.user_id, &meta).await {
        Ok(()) => HttpResponse::Ok().json(LogoutResponse { success: true }),
        Err(error) => handle_domain_error(&error),
    }
}

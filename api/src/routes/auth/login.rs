use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use iw_core::repositories::{TokenRepository, UserDirectory};

use crate::dto::{AuthResponse, LoginRequest};
use crate::handlers::handle_domain_error;

use super::{client_meta, AppState};

/// Handler for POST /api/v1/auth/login
///
/// Authenticates an email/password pair and issues a token pair.
///
/// # Request Body
///
/// ```json
/// {
///     "email": "reader@example.com",
///     "password": "string"
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
///     "refreshToken": "64-char hex secret",
///     "expiresIn": 900
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed request body
/// - 401 Unauthorized: Invalid credentials or unconfirmed email
pub async fn login<U, T>(
    req: HttpRequest,
    state: web::Data<AppState<U, T>>,
    request: web::Json<LoginRequest>,
) -> HttpResponse
where
    U: UserDirectory + 'static,
    T: TokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        let messages: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| format!("Invalid value for field '{field}'"))
            .collect();
        return HttpResponse::BadRequest().json(AuthResponse::failure(messages));
    }

    let meta = client_meta(&req);

    match state
        .auth_service
        .login(&request.email, &request.password, &meta)
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(AuthResponse::from_pair(pair)),
        Err(error) => handle_domain_error(&error),
    }
}

#[cfg(test)]
mod tests {
    use crate::dto::LoginRequest;
    use validator::Validate;

    #[test]
    fn login_request_validates_email_shape() {
        let bad = LoginRequest {
            email: "not-an-email".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(bad.validate().is_err());

        let good = LoginRequest {
            email: "reader@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(good.validate().is_ok());
    }

    #[test]
    fn login_request_rejects_empty_password() {
        let request = LoginRequest {
            email: "reader@example.com".to_string(),
            password: String::new(),
        };
        assert!(request.validate().is_err());
    }
}

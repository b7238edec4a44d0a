//! Application factory
//!
//! Builds the Actix-web application with all authentication routes and
//! middleware wired up.

use std::sync::Arc;

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use iw_core::repositories::{TokenRepository, UserDirectory};
use iw_shared::types::response::ErrorResponse;

use crate::middleware::JwtAuth;
use crate::routes::auth::{login::login, logout::logout, refresh::refresh_token, AppState};

/// Create and configure the application with all dependencies
pub fn create_app<U, T>(
    app_state: web::Data<AppState<U, T>>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<
            impl actix_web::body::MessageBody<Error = Box<dyn std::error::Error>>,
        >,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: UserDirectory + 'static,
    T: TokenRepository + 'static,
{
    let issuer = Arc::clone(&app_state.issuer);

    App::new()
        .app_data(app_state)
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1").service(
                web::scope("/auth")
                    .route("/login", web::post().to(login::<U, T>))
                    .route("/refresh", web::post().to(refresh_token::<U, T>))
                    .route(
                        "/logout",
                        web::post()
                            .to(logout::<U, T>)
                            .wrap(JwtAuth::new(issuer)),
                    ),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "inkwell-api",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        "NOT_FOUND",
        "The requested resource was not found",
    ))
}

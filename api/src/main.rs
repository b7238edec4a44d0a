//! Inkwell API server entry point

use std::sync::Arc;

use actix_web::{web, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use iw_core::services::{auth::AuthService, token::ExpiredTokenReaper, token::TokenIssuer};
use iw_infra::database::{
    connection::create_pool,
    mysql::{MySqlTokenRepository, MySqlUserDirectory},
};
use iw_shared::config::{DatabaseConfig, JwtConfig, ReaperConfig, ServerConfig};

use iw_api::app::create_app;
use iw_api::routes::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting Inkwell API server");

    let server_config = ServerConfig::from_env();
    let database_config = DatabaseConfig::from_env();
    let jwt_config = JwtConfig::from_env();
    let reaper_config = ReaperConfig::from_env();

    let pool = create_pool(&database_config)
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e))?;

    let users = Arc::new(MySqlUserDirectory::new(pool.clone()));
    let tokens = Arc::new(MySqlTokenRepository::new(pool));
    let issuer = Arc::new(
        TokenIssuer::new(jwt_config)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?,
    );

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&users),
        Arc::clone(&tokens),
        Arc::clone(&issuer),
    ));

    // Periodic cleanup of expired refresh token rows.
    let reaper = Arc::new(ExpiredTokenReaper::new(Arc::clone(&tokens), reaper_config));
    reaper.start_background_task();

    let bind_address = server_config.bind_address();
    info!("Server listening on {bind_address}");

    HttpServer::new(move || {
        let state = web::Data::new(AppState::new(
            Arc::clone(&auth_service),
            Arc::clone(&issuer),
        ));
        create_app(state)
    })
    .bind(&bind_address)?
    .run()
    .await
}

//! Warden Auth API
//!
//! Authentication microservice: credential sign-in with lockout, token
//! issuance and rotation, session revocation, and request-time validation.

mod config;
mod error;
mod extractors;
mod handlers;
mod state;

use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Warden Auth API");

    let config = Config::from_env()?;

    let pool = warden_db::create_pool(&config.database_url).await?;
    let state = AppState::new(pool, &config);

    // Build router
    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route("/api/auth/sign_up", post(handlers::auth::sign_up))
        .route("/api/auth/sign_in", post(handlers::auth::sign_in))
        .route("/api/auth/refresh", post(handlers::auth::refresh))
        .route("/api/auth/sign_out", post(handlers::auth::sign_out))
        .route("/api/auth/sign_out_all", post(handlers::auth::sign_out_all))
        .route("/api/auth/validate", get(handlers::auth::validate))
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

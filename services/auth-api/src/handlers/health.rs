//! Health and readiness handlers

use axum::extract::State;
use axum::http::StatusCode;

use crate::state::AppState;

/// GET /health
///
/// Process liveness.
pub async fn health() -> &'static str {
    "OK"
}

/// GET /ready
///
/// Readiness: the database must answer.
pub async fn ready(State(state): State<AppState>) -> Result<&'static str, StatusCode> {
    sqlx::query("SELECT 1")
        .execute(&*state.pool)
        .await
        .map_err(|e| {
            tracing::warn!("Readiness check failed: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        })?;

    Ok("READY")
}

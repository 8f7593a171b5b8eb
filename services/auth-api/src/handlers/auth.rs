//! Authentication handlers (sign-up, sign-in, refresh, sign-out, validate)

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use warden_types::{RefreshRequest, SignInRequest, SignUpRequest, TokenPair};

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct SignOutResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked_sessions: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct PrincipalResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/auth/sign_up
///
/// Register an account and return its first token pair.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> ApiResult<impl IntoResponse> {
    let pair = state.auth.sign_up(&req).await?;
    Ok((StatusCode::CREATED, Json(pair)))
}

/// POST /api/auth/sign_in
///
/// Authenticate a username/password pair.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> ApiResult<Json<TokenPair>> {
    let pair = state.auth.sign_in(&req.username, &req.password).await?;
    Ok(Json(pair))
}

/// POST /api/auth/refresh
///
/// Exchange a refresh token for a fresh access/refresh pair.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<TokenPair>> {
    let pair = state.auth.refresh(&req.refresh_token).await?;
    Ok(Json(pair))
}

/// POST /api/auth/sign_out
///
/// Revoke the session the refresh token is bound to.
pub async fn sign_out(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<SignOutResponse>> {
    state.auth.sign_out(&req.refresh_token).await?;

    Ok(Json(SignOutResponse {
        success: true,
        revoked_sessions: None,
    }))
}

/// POST /api/auth/sign_out_all
///
/// Revoke every session of the token's subject.
pub async fn sign_out_all(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<SignOutResponse>> {
    let revoked = state.auth.sign_out_all(&req.refresh_token).await?;

    Ok(Json(SignOutResponse {
        success: true,
        revoked_sessions: Some(revoked),
    }))
}

/// GET /api/auth/validate
///
/// Validate the bearer token and return the resolved principal.
pub async fn validate(auth_user: AuthUser) -> ApiResult<Json<PrincipalResponse>> {
    Ok(Json(PrincipalResponse {
        id: auth_user.account_id.to_string(),
        username: auth_user.username,
        email: auth_user.email,
        role: auth_user.role,
    }))
}

//! Axum extractors for authentication

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use warden_auth_core::{AuthError, Principal, RouteAccess};
use warden_types::AccountId;

use crate::state::AppState;

/// Authenticated user extracted from request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub account_id: AccountId,
    pub username: String,
    pub email: String,
    pub role: Option<String>,
}

impl From<Principal> for AuthUser {
    fn from(principal: Principal) -> Self {
        Self {
            account_id: principal.account_id,
            username: principal.username,
            email: principal.email,
            role: principal.role,
        }
    }
}

/// Error response for auth failures
#[derive(Debug, Serialize)]
struct AuthErrorResponse {
    error: AuthErrorDetail,
}

#[derive(Debug, Serialize)]
struct AuthErrorDetail {
    code: &'static str,
    message: String,
}

/// Auth rejection type
pub struct AuthRejection {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl AuthRejection {
    fn from_auth_error(err: AuthError) -> Self {
        Self {
            status: StatusCode::from_u16(err.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            code: err.error_code(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let body = AuthErrorResponse {
            error: AuthErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let app_state = AppState::from_ref(state);
            let token = bearer_token(parts)?;

            let principal = app_state
                .gate
                .validate(token.as_deref(), RouteAccess::Required)
                .await
                .map_err(|e| {
                    tracing::debug!(error = ?e, "Token validation failed");
                    AuthRejection::from_auth_error(e)
                })?
                // Required routes always resolve a principal or reject.
                .ok_or_else(|| AuthRejection::from_auth_error(AuthError::Unauthorized))?;

            Ok(AuthUser::from(principal))
        })
    }
}

/// Optional auth extractor - anonymous when no token is presented.
///
/// A token that is present but denylisted, expired, or malformed still
/// rejects; only the complete absence of a token passes through.
#[derive(Debug, Clone)]
#[allow(dead_code)] // Reserved for routes that admit anonymous access
pub struct OptionalAuthUser(pub Option<AuthUser>);

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let app_state = AppState::from_ref(state);
            let token = bearer_token(parts)?;

            let principal = app_state
                .gate
                .validate(token.as_deref(), RouteAccess::Optional)
                .await
                .map_err(AuthRejection::from_auth_error)?;

            Ok(OptionalAuthUser(principal.map(AuthUser::from)))
        })
    }
}

/// Extract the bearer token from the Authorization header, if any
fn bearer_token(parts: &Parts) -> Result<Option<String>, AuthRejection> {
    let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header.to_str().map_err(|_| AuthRejection {
        status: StatusCode::BAD_REQUEST,
        code: "INVALID_HEADER",
        message: "Invalid Authorization header encoding".to_string(),
    })?;

    Ok(auth_str.strip_prefix("Bearer ").map(String::from))
}

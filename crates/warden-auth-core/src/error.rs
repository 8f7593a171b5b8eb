//! Auth errors

use thiserror::Error;

/// Authentication errors
///
/// Every rejection carries a stable kind; lockout and credential errors
/// never reveal whether the username or the password was wrong.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Wrong username or password
    #[error("bad credentials")]
    BadCredentials,

    /// Account temporarily locked after too many failed attempts
    #[error("account locked, try again later")]
    AccountLocked,

    /// Refresh token malformed, unknown, or expired and purged
    #[error("refresh token invalid")]
    RefreshInvalid,

    /// Token has expired
    #[error("token expired")]
    TokenExpired,

    /// Token malformed (bad signature or structure)
    #[error("token malformed")]
    TokenMalformed,

    /// Request not authorized
    #[error("unauthorized")]
    Unauthorized,

    /// Duplicate email and/or username
    #[error("{0}")]
    Conflict(String),

    /// Requested role does not exist
    #[error("the role is not in the system")]
    RoleNotFound,

    /// Account not found
    #[error("account not found")]
    AccountNotFound,

    /// Database error
    #[error("database error: {0}")]
    Database(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadCredentials
            | Self::RefreshInvalid
            | Self::TokenExpired
            | Self::TokenMalformed
            | Self::Unauthorized => 401,
            Self::AccountLocked => 423,
            Self::Conflict(_) => 409,
            Self::RoleNotFound | Self::AccountNotFound => 404,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadCredentials => "BAD_CREDENTIALS",
            Self::AccountLocked => "ACCOUNT_LOCKED",
            Self::RefreshInvalid => "REFRESH_INVALID",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenMalformed => "TOKEN_MALFORMED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Conflict(_) => "CONFLICT",
            Self::RoleNotFound => "ROLE_NOT_FOUND",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<warden_db::DbError> for AuthError {
    fn from(err: warden_db::DbError) -> Self {
        tracing::error!("Database error: {}", err);
        Self::Database(err.to_string())
    }
}

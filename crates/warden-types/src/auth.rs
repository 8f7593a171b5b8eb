//! Authentication request payloads

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::RoleName;

/// Sign-up request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    /// Desired username (unique)
    pub username: String,
    /// Email address (unique)
    pub email: String,
    /// Plaintext password; hashed before storage, never persisted
    pub password: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Date of birth
    pub birth_date: NaiveDate,
    /// Requested role
    pub role: RoleName,
}

/// Sign-in request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    /// Username
    pub username: String,
    /// Plaintext password
    pub password: String,
}

/// Refresh / sign-out request carrying a refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token to exchange or revoke
    pub refresh_token: String,
}

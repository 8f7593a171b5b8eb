//! Database row models
//!
//! These types map directly to database rows using SQLx's FromRow derive.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Account row from the database
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub role_id: i64,
    pub failed_attempts: i32,
    pub locked_at: Option<DateTime<Utc>>,
    pub last_login_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session row from the database
///
/// One row per refresh-token lineage. `token_digest` is the deterministic
/// lookup key for the current token; the token itself is stored encrypted.
#[derive(Debug, Clone, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub account_id: i64,
    pub refresh_token_enc: String,
    pub token_digest: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

/// Role row from the database
#[derive(Debug, Clone, FromRow)]
pub struct RoleRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Denylist row from the database
///
/// Access tokens explicitly invalidated before their natural expiry.
#[derive(Debug, Clone, FromRow)]
pub struct DenylistRow {
    pub token: String,
    pub account_id: i64,
    pub expires_at: DateTime<Utc>,
}

// Conversion helpers from row types to warden-types domain ids
impl AccountRow {
    /// Convert to domain AccountId
    pub fn account_id(&self) -> warden_types::AccountId {
        warden_types::AccountId(self.id)
    }
}

impl SessionRow {
    /// Convert to domain SessionId
    pub fn session_id(&self) -> warden_types::SessionId {
        warden_types::SessionId(self.id)
    }

    /// Convert to domain AccountId
    pub fn account_id(&self) -> warden_types::AccountId {
        warden_types::AccountId(self.account_id)
    }
}

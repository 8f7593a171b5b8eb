//! Repository traits
//!
//! Define async repository interfaces for database operations. All lookups
//! return a not-found indicator (`Option` / `bool`) rather than an error for
//! absence; mutations that race (failure counters, token rotation) are single
//! atomic statements in the implementations.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::*;

/// Account repository trait
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by ID
    async fn find_by_id(&self, id: i64) -> DbResult<Option<AccountRow>>;

    /// Find an account by username
    async fn find_by_username(&self, username: &str) -> DbResult<Option<AccountRow>>;

    /// Whether an account with this email exists
    async fn exists_by_email(&self, email: &str) -> DbResult<bool>;

    /// Whether an account with this username exists
    async fn exists_by_username(&self, username: &str) -> DbResult<bool>;

    /// Create a new account
    async fn create(&self, account: CreateAccount) -> DbResult<AccountRow>;

    /// Atomically record one failed sign-in attempt.
    ///
    /// Increments `failed_attempts` and, when the new value reaches
    /// `lock_threshold`, stamps `locked_at = now` in the same statement.
    /// Returns the updated row. Concurrent callers must not lose increments.
    async fn record_failed_attempt(
        &self,
        id: i64,
        lock_threshold: i32,
        now: DateTime<Utc>,
    ) -> DbResult<AccountRow>;

    /// Reset `failed_attempts` to 0 and clear `locked_at`
    async fn reset_lockout(&self, id: i64) -> DbResult<()>;

    /// Record a successful login timestamp
    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> DbResult<()>;

    /// Delete an account
    async fn delete(&self, id: i64) -> DbResult<()>;
}

/// Create account input
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub role_id: i64,
    pub now: DateTime<Utc>,
}

/// Session repository trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Find a session by its lineage ID
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SessionRow>>;

    /// Find the session whose current token has this digest
    async fn find_by_token_digest(&self, digest: &str) -> DbResult<Option<SessionRow>>;

    /// Find all sessions for an account
    async fn find_by_account_id(&self, account_id: i64) -> DbResult<Vec<SessionRow>>;

    /// Create a new session
    async fn create(&self, session: CreateSession) -> DbResult<SessionRow>;

    /// Swap the session's token, but only if the stored digest still equals
    /// `expected_digest`. Returns `true` when the swap happened; `false`
    /// means the presented token is no longer the lineage's current one.
    async fn rotate_token(
        &self,
        id: Uuid,
        expected_digest: &str,
        update: RotateSession,
    ) -> DbResult<bool>;

    /// Mark a session revoked. Returns `true` if a row was updated.
    async fn revoke(&self, id: Uuid) -> DbResult<bool>;

    /// Revoke every session owned by the account; returns the count touched
    async fn revoke_all_for_account(&self, account_id: i64) -> DbResult<u64>;

    /// Hard-delete a session (expired-token replay terminates the lineage)
    async fn delete(&self, id: Uuid) -> DbResult<()>;

    /// Delete sessions past their expiry
    async fn delete_expired(&self, now: DateTime<Utc>) -> DbResult<u64>;
}

/// Create session input
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub id: Uuid,
    pub account_id: i64,
    pub refresh_token_enc: String,
    pub token_digest: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Rotation update for a session
#[derive(Debug, Clone)]
pub struct RotateSession {
    pub refresh_token_enc: String,
    pub token_digest: String,
    pub expires_at: DateTime<Utc>,
}

/// Role repository trait
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Find a role by ID
    async fn find_by_id(&self, id: i64) -> DbResult<Option<RoleRow>>;

    /// Find a role by its stable name
    async fn find_by_name(&self, name: &str) -> DbResult<Option<RoleRow>>;
}

/// Denylist repository trait
///
/// Entries are inserted by the logout collaborator; the request-time gate
/// only reads.
#[async_trait]
pub trait DenylistRepository: Send + Sync {
    /// Whether the token has been denylisted
    async fn contains(&self, token: &str) -> DbResult<bool>;

    /// Insert a denylist entry
    async fn insert(&self, entry: CreateDenylistEntry) -> DbResult<()>;

    /// Garbage-collect entries whose token has expired anyway
    async fn delete_expired(&self, now: DateTime<Utc>) -> DbResult<u64>;
}

/// Create denylist entry input
#[derive(Debug, Clone)]
pub struct CreateDenylistEntry {
    pub token: String,
    pub account_id: i64,
    pub expires_at: DateTime<Utc>,
}

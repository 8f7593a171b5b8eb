//! Refresh-token session protocol
//!
//! Creates session lineages, rotates refresh tokens, and revokes sessions.
//! An expired refresh token that is presented again terminates its lineage;
//! a rotated-out token loses the compare-and-swap and is rejected.

use std::sync::Arc;

use warden_db::{
    AccountRepository, AccountRow, CreateSession, RoleRepository, RotateSession,
    SessionRepository,
};
use warden_types::{RoleName, SessionId, TokenPair};

use crate::clock::Clock;
use crate::crypto::{token_digest, TokenVault};
use crate::token::{TokenCodec, TokenError};
use crate::AuthError;

/// Resolve the role name for an account's role reference.
///
/// A dangling role reference is data corruption, not a caller mistake.
pub(crate) async fn role_for_account<R: RoleRepository>(
    roles: &R,
    account: &AccountRow,
) -> Result<RoleName, AuthError> {
    let role = roles.find_by_id(account.role_id).await?.ok_or_else(|| {
        AuthError::Internal(format!(
            "role {} missing for account {}",
            account.role_id, account.id
        ))
    })?;

    role.name
        .parse()
        .map_err(|_| AuthError::Internal(format!("unknown role name '{}'", role.name)))
}

/// Orchestrates refresh-token validation, session lookup, and rotation
pub struct RefreshRotation<A, S, R>
where
    A: AccountRepository,
    S: SessionRepository,
    R: RoleRepository,
{
    codec: Arc<TokenCodec>,
    vault: TokenVault,
    accounts: Arc<A>,
    sessions: Arc<S>,
    roles: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<A, S, R> RefreshRotation<A, S, R>
where
    A: AccountRepository,
    S: SessionRepository,
    R: RoleRepository,
{
    /// Create the rotation protocol
    pub fn new(
        codec: Arc<TokenCodec>,
        vault: TokenVault,
        accounts: Arc<A>,
        sessions: Arc<S>,
        roles: Arc<R>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            codec,
            vault,
            accounts,
            sessions,
            roles,
            clock,
        }
    }

    /// Start a new session lineage for the account.
    ///
    /// Returns the raw refresh token; only its encrypted form and digest
    /// reach the store.
    pub async fn create_session(&self, account: &AccountRow) -> Result<String, AuthError> {
        let session_id = SessionId::new();
        let (token, expires_at) = self.codec.issue_refresh_token(session_id, account)?;

        let create = CreateSession {
            id: session_id.0,
            account_id: account.id,
            refresh_token_enc: self.vault.seal(&token)?,
            token_digest: token_digest(&token),
            created_at: self.clock.now(),
            expires_at,
        };
        self.sessions.create(create).await?;

        tracing::debug!(account = %account.username, session = %session_id, "session created");
        Ok(token)
    }

    /// Exchange a refresh token for a fresh access/refresh pair.
    pub async fn rotate(&self, presented: &str) -> Result<TokenPair, AuthError> {
        let claims = match self.codec.parse(presented) {
            Ok(claims) => claims,
            Err(TokenError::Expired(_)) => {
                // Replay of an expired token: the lineage ends here, whether
                // or not the session still exists.
                if let Some(session) = self
                    .sessions
                    .find_by_token_digest(&token_digest(presented))
                    .await?
                {
                    self.sessions.delete(session.id).await?;
                    tracing::warn!(session = %session.id, "expired refresh token presented, lineage purged");
                }
                return Err(AuthError::RefreshInvalid);
            }
            Err(TokenError::Malformed) => return Err(AuthError::RefreshInvalid),
        };

        let session_id = claims.sid.ok_or(AuthError::RefreshInvalid)?;
        let session = self
            .sessions
            .find_by_id(session_id.0)
            .await?
            .ok_or(AuthError::RefreshInvalid)?;

        // Explicitly terminated is distinct from missing or expired.
        if session.revoked {
            return Err(AuthError::BadCredentials);
        }

        let account = self
            .accounts
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::AccountNotFound)?;
        let role = role_for_account(self.roles.as_ref(), &account).await?;

        let access_token = self.codec.issue_access_token(&account, role)?;
        let (refresh_token, expires_at) = self.codec.issue_refresh_token(session_id, &account)?;

        let swapped = self
            .sessions
            .rotate_token(
                session.id,
                &token_digest(presented),
                RotateSession {
                    refresh_token_enc: self.vault.seal(&refresh_token)?,
                    token_digest: token_digest(&refresh_token),
                    expires_at,
                },
            )
            .await?;

        // The presented token is no longer the lineage's current one: either
        // it was already rotated out, or a concurrent rotation won the swap.
        if !swapped {
            tracing::warn!(session = %session_id, "stale refresh token presented, rotation refused");
            return Err(AuthError::RefreshInvalid);
        }

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.codec.access_ttl_secs(),
        ))
    }

    /// Revoke a single session lineage
    pub async fn revoke(&self, session_id: SessionId) -> Result<(), AuthError> {
        if !self.sessions.revoke(session_id.0).await? {
            return Err(AuthError::RefreshInvalid);
        }

        tracing::debug!(session = %session_id, "session revoked");
        Ok(())
    }

    /// Revoke every session owned by the account; returns the count touched
    pub async fn revoke_all(&self, account_id: i64) -> Result<u64, AuthError> {
        let count = self.sessions.revoke_all_for_account(account_id).await?;
        tracing::debug!(account_id, count, "all sessions revoked");
        Ok(count)
    }

    /// Sign out the session the refresh token is bound to
    pub async fn sign_out(&self, presented: &str) -> Result<(), AuthError> {
        let claims = self
            .codec
            .parse(presented)
            .map_err(|_| AuthError::RefreshInvalid)?;
        let session_id = claims.sid.ok_or(AuthError::RefreshInvalid)?;

        self.revoke(session_id).await
    }

    /// Sign out every session of the token's subject
    pub async fn sign_out_all(&self, presented: &str) -> Result<u64, AuthError> {
        let claims = self
            .codec
            .parse(presented)
            .map_err(|_| AuthError::RefreshInvalid)?;

        let account = self
            .accounts
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        self.revoke_all(account.id).await
    }
}

impl<A, S, R> std::fmt::Debug for RefreshRotation<A, S, R>
where
    A: AccountRepository,
    S: SessionRepository,
    R: RoleRepository,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshRotation").finish_non_exhaustive()
    }
}

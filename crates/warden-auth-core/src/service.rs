//! Auth service - ties together lockout, credential verification, and the
//! token-session protocol

use std::sync::Arc;

use warden_db::{AccountRepository, CreateAccount, RoleRepository, SessionRepository};
use warden_types::{SignUpRequest, TokenPair};

use crate::clock::Clock;
use crate::crypto::TokenVault;
use crate::lockout::{LockState, LockoutPolicy};
use crate::password::SecretHasher;
use crate::rotation::{role_for_account, RefreshRotation};
use crate::token::TokenCodec;
use crate::{AuthConfig, AuthError};

/// Authentication service
///
/// Composes the lockout policy, the credential verifier, and the rotation
/// protocol into the sign-up / sign-in / refresh / sign-out operations.
/// Generic over the repository traits; collaborators are constructor
/// arguments, never ambient state.
pub struct AuthService<A, S, R>
where
    A: AccountRepository,
    S: SessionRepository,
    R: RoleRepository,
{
    codec: Arc<TokenCodec>,
    hasher: Arc<dyn SecretHasher>,
    lockout: LockoutPolicy<A>,
    rotation: RefreshRotation<A, S, R>,
    accounts: Arc<A>,
    roles: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<A, S, R> AuthService<A, S, R>
where
    A: AccountRepository,
    S: SessionRepository,
    R: RoleRepository,
{
    /// Create a new auth service from a validated config
    pub fn new(
        config: &AuthConfig,
        accounts: Arc<A>,
        sessions: Arc<S>,
        roles: Arc<R>,
        hasher: Arc<dyn SecretHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let codec = Arc::new(TokenCodec::new(config, Arc::clone(&clock)));
        let vault = TokenVault::new(config.storage_key_bytes())
            .expect("storage key validated at construction");

        let lockout = LockoutPolicy::new(config, Arc::clone(&accounts), Arc::clone(&clock));
        let rotation = RefreshRotation::new(
            Arc::clone(&codec),
            vault,
            Arc::clone(&accounts),
            Arc::clone(&sessions),
            Arc::clone(&roles),
            Arc::clone(&clock),
        );

        Self {
            codec,
            hasher,
            lockout,
            rotation,
            accounts,
            roles,
            clock,
        }
    }

    /// The codec, for callers that need to validate tokens directly
    pub fn codec(&self) -> Arc<TokenCodec> {
        Arc::clone(&self.codec)
    }

    /// Register a new account and return its first token pair
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<TokenPair, AuthError> {
        let email_taken = self.accounts.exists_by_email(&request.email).await?;
        let username_taken = self.accounts.exists_by_username(&request.username).await?;

        match (email_taken, username_taken) {
            (true, true) => {
                return Err(AuthError::Conflict(format!(
                    "the username '{}' and the email '{}' are already taken in the system",
                    request.username, request.email
                )))
            }
            (true, false) => {
                return Err(AuthError::Conflict(format!(
                    "the email '{}' is already taken in the system",
                    request.email
                )))
            }
            (false, true) => {
                return Err(AuthError::Conflict(format!(
                    "the username '{}' is already taken in the system",
                    request.username
                )))
            }
            (false, false) => {}
        }

        let role_row = self
            .roles
            .find_by_name(request.role.as_str())
            .await?
            .ok_or(AuthError::RoleNotFound)?;

        let password_hash = self.hasher.hash(&request.password)?;
        let account = self
            .accounts
            .create(CreateAccount {
                username: request.username.clone(),
                email: request.email.clone(),
                password_hash,
                first_name: request.first_name.clone(),
                last_name: request.last_name.clone(),
                birth_date: request.birth_date,
                role_id: role_row.id,
                now: self.clock.now(),
            })
            .await?;

        tracing::info!(account = %account.username, "account created");

        let access_token = self.codec.issue_access_token(&account, request.role)?;
        let refresh_token = self.rotation.create_session(&account).await?;

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.codec.access_ttl_secs(),
        ))
    }

    /// Authenticate a username/password pair and start a session.
    ///
    /// A locked account is rejected before the password is ever checked, so
    /// lockout cannot be used to probe credentials.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<TokenPair, AuthError> {
        let account = self
            .accounts
            .find_by_username(username)
            .await?
            .ok_or(AuthError::BadCredentials)?;

        if self.lockout.check(&account).await? == LockState::Locked {
            return Err(AuthError::AccountLocked);
        }

        if !self.hasher.verify(password, &account.password_hash)? {
            self.lockout.record_failure(&account).await?;
            tracing::debug!(account = %account.username, "sign-in failed");
            return Err(AuthError::BadCredentials);
        }

        self.lockout.record_success(&account).await?;
        self.accounts
            .record_login(account.id, self.clock.now())
            .await?;

        let role = role_for_account(self.roles.as_ref(), &account).await?;
        let access_token = self.codec.issue_access_token(&account, role)?;
        let refresh_token = self.rotation.create_session(&account).await?;

        tracing::info!(account = %account.username, "sign-in succeeded");

        Ok(TokenPair::new(
            access_token,
            refresh_token,
            self.codec.access_ttl_secs(),
        ))
    }

    /// Exchange a refresh token for a fresh pair
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        self.rotation.rotate(refresh_token).await
    }

    /// Revoke the session the refresh token is bound to
    pub async fn sign_out(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.rotation.sign_out(refresh_token).await
    }

    /// Revoke every session of the token's subject; returns the count
    pub async fn sign_out_all(&self, refresh_token: &str) -> Result<u64, AuthError> {
        self.rotation.sign_out_all(refresh_token).await
    }
}

impl<A, S, R> std::fmt::Debug for AuthService<A, S, R>
where
    A: AccountRepository,
    S: SessionRepository,
    R: RoleRepository,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

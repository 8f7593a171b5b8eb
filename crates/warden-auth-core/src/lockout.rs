//! Brute-force lockout policy
//!
//! Per-account failed-attempt counter with a time-boxed lock. The counter
//! mutations go through the repository's atomic operations; this module
//! only decides the state transitions.

use chrono::Duration as ChronoDuration;
use std::sync::Arc;

use warden_db::{AccountRepository, AccountRow};

use crate::clock::Clock;
use crate::{AuthConfig, AuthError};

/// Lock state of an account at check time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// Credential checks may proceed
    Unlocked,
    /// Account is locked; credentials must not be checked
    Locked,
}

/// Failed-attempt tracking and lock-window enforcement
pub struct LockoutPolicy<A: AccountRepository> {
    accounts: Arc<A>,
    max_failed_attempts: i32,
    lock_duration: ChronoDuration,
    clock: Arc<dyn Clock>,
}

impl<A: AccountRepository> LockoutPolicy<A> {
    /// Create a policy from config
    pub fn new(config: &AuthConfig, accounts: Arc<A>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts,
            max_failed_attempts: config.max_failed_attempts,
            lock_duration: ChronoDuration::seconds(config.lock_duration.as_secs() as i64),
            clock,
        }
    }

    /// Check the account's lock state, auto-unlocking an elapsed lock.
    ///
    /// The first check that observes the threshold crossed without a lock
    /// timestamp records one more failure, which is also what stamps
    /// `locked_at`. The counter can therefore exceed the threshold while
    /// the account stays locked; auto-unlock resets it either way.
    pub async fn check(&self, account: &AccountRow) -> Result<LockState, AuthError> {
        if account.failed_attempts < self.max_failed_attempts {
            return Ok(LockState::Unlocked);
        }

        match account.locked_at {
            None => {
                self.record_failure(account).await?;
                tracing::warn!(account = %account.username, "account crossed failure threshold, locking");
                Ok(LockState::Locked)
            }
            Some(since) if self.clock.now() < since + self.lock_duration => Ok(LockState::Locked),
            Some(_) => {
                self.accounts.reset_lockout(account.id).await?;
                tracing::info!(account = %account.username, "lock window elapsed, auto-unlocked");
                Ok(LockState::Unlocked)
            }
        }
    }

    /// Record one failed sign-in attempt.
    ///
    /// The repository stamps `locked_at` in the same atomic statement when
    /// the new count reaches the threshold.
    pub async fn record_failure(&self, account: &AccountRow) -> Result<AccountRow, AuthError> {
        let updated = self
            .accounts
            .record_failed_attempt(account.id, self.max_failed_attempts, self.clock.now())
            .await?;

        Ok(updated)
    }

    /// Reset the counter and clear the lock after a successful sign-in
    pub async fn record_success(&self, account: &AccountRow) -> Result<(), AuthError> {
        self.accounts.reset_lockout(account.id).await?;
        Ok(())
    }
}

impl<A: AccountRepository> std::fmt::Debug for LockoutPolicy<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockoutPolicy")
            .field("max_failed_attempts", &self.max_failed_attempts)
            .field("lock_duration", &self.lock_duration)
            .finish_non_exhaustive()
    }
}

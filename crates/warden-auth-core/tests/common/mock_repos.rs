//! Mock repositories for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

use warden_db::{
    AccountRepository, AccountRow, CreateAccount, CreateDenylistEntry, CreateSession, DbResult,
    DenylistRepository, DenylistRow, RoleRepository, RoleRow, RotateSession, SessionRepository,
    SessionRow,
};

/// In-memory account repository for testing
#[derive(Default)]
pub struct MockAccountRepository {
    accounts: DashMap<i64, AccountRow>,
    by_username: DashMap<String, i64>,
    by_email: DashMap<String, i64>,
    next_id: AtomicI64,
}

impl MockAccountRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Insert a fully-formed row directly
    #[allow(dead_code)]
    pub fn insert_account(&self, account: AccountRow) {
        self.by_username.insert(account.username.clone(), account.id);
        self.by_email.insert(account.email.clone(), account.id);
        self.accounts.insert(account.id, account);
    }

    /// Read the current failure counter, for assertions
    #[allow(dead_code)]
    pub fn failed_attempts(&self, id: i64) -> i32 {
        self.accounts
            .get(&id)
            .map(|row| row.failed_attempts)
            .unwrap_or_default()
    }
}

#[async_trait]
impl AccountRepository for MockAccountRepository {
    async fn find_by_id(&self, id: i64) -> DbResult<Option<AccountRow>> {
        Ok(self.accounts.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<AccountRow>> {
        Ok(self
            .by_username
            .get(username)
            .and_then(|id| self.accounts.get(id.value()).map(|r| r.value().clone())))
    }

    async fn exists_by_email(&self, email: &str) -> DbResult<bool> {
        Ok(self.by_email.contains_key(email))
    }

    async fn exists_by_username(&self, username: &str) -> DbResult<bool> {
        Ok(self.by_username.contains_key(username))
    }

    async fn create(&self, account: CreateAccount) -> DbResult<AccountRow> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let row = AccountRow {
            id,
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            first_name: account.first_name,
            last_name: account.last_name,
            birth_date: account.birth_date,
            role_id: account.role_id,
            failed_attempts: 0,
            locked_at: None,
            last_login_at: account.now,
            created_at: account.now,
            updated_at: account.now,
        };
        self.by_username.insert(row.username.clone(), id);
        self.by_email.insert(row.email.clone(), id);
        self.accounts.insert(id, row.clone());
        Ok(row)
    }

    async fn record_failed_attempt(
        &self,
        id: i64,
        lock_threshold: i32,
        now: DateTime<Utc>,
    ) -> DbResult<AccountRow> {
        // Mirrors the single-statement semantics of the Postgres impl: the
        // increment and the conditional lock stamp happen under one entry
        // lock.
        let mut entry = self.accounts.get_mut(&id).ok_or(warden_db::DbError::NotFound)?;
        entry.failed_attempts += 1;
        if entry.failed_attempts >= lock_threshold && entry.locked_at.is_none() {
            entry.locked_at = Some(now);
        }
        entry.updated_at = now;
        Ok(entry.clone())
    }

    async fn reset_lockout(&self, id: i64) -> DbResult<()> {
        if let Some(mut entry) = self.accounts.get_mut(&id) {
            entry.failed_attempts = 0;
            entry.locked_at = None;
        }
        Ok(())
    }

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> DbResult<()> {
        if let Some(mut entry) = self.accounts.get_mut(&id) {
            entry.last_login_at = at;
            entry.updated_at = at;
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        if let Some((_, account)) = self.accounts.remove(&id) {
            self.by_username.remove(&account.username);
            self.by_email.remove(&account.email);
        }
        Ok(())
    }
}

/// In-memory session repository for testing
#[derive(Default)]
pub struct MockSessionRepository {
    sessions: DashMap<Uuid, SessionRow>,
    by_digest: DashMap<String, Uuid>,
}

impl MockSessionRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of live session rows, for assertions
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl SessionRepository for MockSessionRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SessionRow>> {
        Ok(self.sessions.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_token_digest(&self, digest: &str) -> DbResult<Option<SessionRow>> {
        Ok(self
            .by_digest
            .get(digest)
            .and_then(|id| self.sessions.get(id.value()).map(|r| r.value().clone())))
    }

    async fn find_by_account_id(&self, account_id: i64) -> DbResult<Vec<SessionRow>> {
        Ok(self
            .sessions
            .iter()
            .filter(|r| r.value().account_id == account_id)
            .map(|r| r.value().clone())
            .collect())
    }

    async fn create(&self, session: CreateSession) -> DbResult<SessionRow> {
        let row = SessionRow {
            id: session.id,
            account_id: session.account_id,
            refresh_token_enc: session.refresh_token_enc,
            token_digest: session.token_digest.clone(),
            created_at: session.created_at,
            expires_at: session.expires_at,
            revoked: false,
        };
        self.by_digest.insert(session.token_digest, session.id);
        self.sessions.insert(session.id, row.clone());
        Ok(row)
    }

    async fn rotate_token(
        &self,
        id: Uuid,
        expected_digest: &str,
        update: RotateSession,
    ) -> DbResult<bool> {
        let mut entry = match self.sessions.get_mut(&id) {
            Some(entry) => entry,
            None => return Ok(false),
        };

        if entry.revoked
            || !warden_auth_core::constant_time_eq(
                entry.token_digest.as_bytes(),
                expected_digest.as_bytes(),
            )
        {
            return Ok(false);
        }

        self.by_digest.remove(&entry.token_digest);
        entry.refresh_token_enc = update.refresh_token_enc;
        entry.token_digest = update.token_digest.clone();
        entry.expires_at = update.expires_at;
        self.by_digest.insert(update.token_digest, id);
        Ok(true)
    }

    async fn revoke(&self, id: Uuid) -> DbResult<bool> {
        match self.sessions.get_mut(&id) {
            Some(mut entry) => {
                entry.revoked = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn revoke_all_for_account(&self, account_id: i64) -> DbResult<u64> {
        let mut count = 0;
        for mut entry in self.sessions.iter_mut() {
            if entry.account_id == account_id {
                entry.revoked = true;
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        if let Some((_, session)) = self.sessions.remove(&id) {
            self.by_digest.remove(&session.token_digest);
        }
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DbResult<u64> {
        let expired: Vec<Uuid> = self
            .sessions
            .iter()
            .filter(|r| r.expires_at < now)
            .map(|r| r.id)
            .collect();
        let count = expired.len() as u64;
        for id in expired {
            if let Some((_, session)) = self.sessions.remove(&id) {
                self.by_digest.remove(&session.token_digest);
            }
        }
        Ok(count)
    }
}

/// In-memory role repository for testing
#[derive(Default)]
pub struct MockRoleRepository {
    roles: DashMap<i64, RoleRow>,
}

impl MockRoleRepository {
    /// Repository seeded with the "user" role only
    pub fn new() -> Arc<Self> {
        let repo = Self::default();
        repo.insert_role(RoleRow {
            id: 1,
            name: "user".to_string(),
            description: Some("Regular account".to_string()),
        });
        Arc::new(repo)
    }

    pub fn insert_role(&self, role: RoleRow) {
        self.roles.insert(role.id, role);
    }
}

#[async_trait]
impl RoleRepository for MockRoleRepository {
    async fn find_by_id(&self, id: i64) -> DbResult<Option<RoleRow>> {
        Ok(self.roles.get(&id).map(|r| r.value().clone()))
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Option<RoleRow>> {
        Ok(self
            .roles
            .iter()
            .find(|r| r.value().name == name)
            .map(|r| r.value().clone()))
    }
}

/// In-memory denylist repository for testing
#[derive(Default)]
pub struct MockDenylistRepository {
    entries: DashMap<String, DenylistRow>,
}

impl MockDenylistRepository {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl DenylistRepository for MockDenylistRepository {
    async fn contains(&self, token: &str) -> DbResult<bool> {
        Ok(self.entries.contains_key(token))
    }

    async fn insert(&self, entry: CreateDenylistEntry) -> DbResult<()> {
        self.entries.insert(
            entry.token.clone(),
            DenylistRow {
                token: entry.token,
                account_id: entry.account_id,
                expires_at: entry.expires_at,
            },
        );
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DbResult<u64> {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|r| r.expires_at < now)
            .map(|r| r.key().clone())
            .collect();
        let count = expired.len() as u64;
        for token in expired {
            self.entries.remove(&token);
        }
        Ok(count)
    }
}

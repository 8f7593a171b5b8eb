//! Application state

use std::ops::Deref;
use std::sync::Arc;

use warden_auth_core::{
    Argon2SecretHasher, AuthService, RevocationGate, SecretHasher, SystemClock,
};
use warden_db::pg::{PgAccountRepository, PgDenylistRepository, PgRoleRepository, PgSessionRepository};
use warden_db::{DbPool, Repositories};

use crate::config::Config;

/// Type alias for the auth service with concrete repository types
pub type AuthServiceImpl =
    AuthService<PgAccountRepository, PgSessionRepository, PgRoleRepository>;

/// Type alias for the gate with concrete repository types
pub type RevocationGateImpl = RevocationGate<PgAccountRepository, PgDenylistRepository>;

/// Shared database pool wrapper for health checks
#[derive(Clone)]
pub struct SharedPool(Arc<DbPool>);

impl Deref for SharedPool {
    type Target = DbPool;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Auth service for sign-up/sign-in and the token-session protocol
    pub auth: Arc<AuthServiceImpl>,
    /// Request-time token validation gate
    pub gate: Arc<RevocationGateImpl>,
    /// Database connection pool (shared reference for health checks)
    pub pool: SharedPool,
}

impl AppState {
    /// Create new application state, wiring the service over the pool
    pub fn new(pool: DbPool, config: &Config) -> Self {
        let repos = Repositories::new(pool.clone());

        let accounts = Arc::new(repos.accounts);
        let sessions = Arc::new(repos.sessions);
        let roles = Arc::new(repos.roles);
        let denylist = Arc::new(repos.denylist);

        let hasher: Arc<dyn SecretHasher> = Arc::new(Argon2SecretHasher::new());
        let clock = Arc::new(SystemClock);

        let auth = AuthService::new(
            &config.auth,
            Arc::clone(&accounts),
            sessions,
            roles,
            hasher,
            clock,
        );
        let gate = RevocationGate::new(auth.codec(), accounts, denylist);

        Self {
            auth: Arc::new(auth),
            gate: Arc::new(gate),
            pool: SharedPool(Arc::new(pool)),
        }
    }
}

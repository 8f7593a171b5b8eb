//! PostgreSQL repository implementations

mod account;
mod denylist;
mod role;
mod session;

pub use account::PgAccountRepository;
pub use denylist::PgDenylistRepository;
pub use role::PgRoleRepository;
pub use session::PgSessionRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub accounts: PgAccountRepository,
    pub sessions: PgSessionRepository,
    pub roles: PgRoleRepository,
    pub denylist: PgDenylistRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            accounts: PgAccountRepository::new(pool.clone()),
            sessions: PgSessionRepository::new(pool.clone()),
            roles: PgRoleRepository::new(pool.clone()),
            denylist: PgDenylistRepository::new(pool),
        }
    }
}

//! Warden DB - Database abstractions
//!
//! SQLx-based database layer for Warden services. The core crate depends on
//! the repository traits only; the PostgreSQL implementations live behind
//! [`Repositories`].
//!
//! # Example
//!
//! ```rust,ignore
//! use warden_db::{create_pool, Repositories};
//!
//! let pool = create_pool("postgres://localhost/warden").await?;
//! let repos = Repositories::new(pool);
//!
//! let account = repos.accounts.find_by_username("alice").await?;
//! ```

pub mod error;
pub mod models;
pub mod pg;
pub mod pool;
pub mod repo;

pub use error::{DbError, DbResult};
pub use models::*;
pub use pg::Repositories;
pub use pool::{create_pool, DbPool};
pub use repo::*;

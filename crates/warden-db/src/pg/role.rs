//! PostgreSQL role repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::RoleRow;
use crate::repo::RoleRepository;

/// PostgreSQL role repository
#[derive(Clone)]
pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    /// Create a new role repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn find_by_id(&self, id: i64) -> DbResult<Option<RoleRow>> {
        let role =
            sqlx::query_as::<_, RoleRow>("SELECT id, name, description FROM roles WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(role)
    }

    async fn find_by_name(&self, name: &str) -> DbResult<Option<RoleRow>> {
        let role =
            sqlx::query_as::<_, RoleRow>("SELECT id, name, description FROM roles WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        Ok(role)
    }
}

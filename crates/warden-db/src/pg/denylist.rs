//! PostgreSQL denylist repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::DbResult;
use crate::repo::{CreateDenylistEntry, DenylistRepository};

/// PostgreSQL token denylist repository
#[derive(Clone)]
pub struct PgDenylistRepository {
    pool: PgPool,
}

impl PgDenylistRepository {
    /// Create a new denylist repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DenylistRepository for PgDenylistRepository {
    async fn contains(&self, token: &str) -> DbResult<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM token_denylist WHERE token = $1)")
                .bind(token)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    async fn insert(&self, entry: CreateDenylistEntry) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT INTO token_denylist (token, account_id, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (token) DO NOTHING
            "#,
        )
        .bind(&entry.token)
        .bind(entry.account_id)
        .bind(entry.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM token_denylist WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

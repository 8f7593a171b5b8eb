//! PostgreSQL session repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbResult;
use crate::models::SessionRow;
use crate::repo::{CreateSession, RotateSession, SessionRepository};

/// PostgreSQL session repository
#[derive(Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new session repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn find_by_id(&self, id: Uuid) -> DbResult<Option<SessionRow>> {
        let session = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, account_id, refresh_token_enc, token_digest,
                   created_at, expires_at, revoked
            FROM sessions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn find_by_token_digest(&self, digest: &str) -> DbResult<Option<SessionRow>> {
        let session = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, account_id, refresh_token_enc, token_digest,
                   created_at, expires_at, revoked
            FROM sessions
            WHERE token_digest = $1
            "#,
        )
        .bind(digest)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    async fn find_by_account_id(&self, account_id: i64) -> DbResult<Vec<SessionRow>> {
        let sessions = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT id, account_id, refresh_token_enc, token_digest,
                   created_at, expires_at, revoked
            FROM sessions
            WHERE account_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    async fn create(&self, session: CreateSession) -> DbResult<SessionRow> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            INSERT INTO sessions
                (id, account_id, refresh_token_enc, token_digest, created_at, expires_at, revoked)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE)
            RETURNING id, account_id, refresh_token_enc, token_digest,
                      created_at, expires_at, revoked
            "#,
        )
        .bind(session.id)
        .bind(session.account_id)
        .bind(&session.refresh_token_enc)
        .bind(&session.token_digest)
        .bind(session.created_at)
        .bind(session.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn rotate_token(
        &self,
        id: Uuid,
        expected_digest: &str,
        update: RotateSession,
    ) -> DbResult<bool> {
        // Compare-and-swap: two rotations racing on the same token cannot
        // both match the stored digest.
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET refresh_token_enc = $3, token_digest = $4, expires_at = $5
            WHERE id = $1 AND token_digest = $2 AND NOT revoked
            "#,
        )
        .bind(id)
        .bind(expected_digest)
        .bind(&update.refresh_token_enc)
        .bind(&update.token_digest)
        .bind(update.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke(&self, id: Uuid) -> DbResult<bool> {
        let result = sqlx::query("UPDATE sessions SET revoked = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_for_account(&self, account_id: i64) -> DbResult<u64> {
        let result = sqlx::query("UPDATE sessions SET revoked = TRUE WHERE account_id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> DbResult<()> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

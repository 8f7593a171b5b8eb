//! PostgreSQL account repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::DbResult;
use crate::models::AccountRow;
use crate::repo::{AccountRepository, CreateAccount};

/// PostgreSQL account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Create a new account repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_id(&self, id: i64) -> DbResult<Option<AccountRow>> {
        let account = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name, birth_date,
                   role_id, failed_attempts, locked_at, last_login_at, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> DbResult<Option<AccountRow>> {
        let account = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, username, email, password_hash, first_name, last_name, birth_date,
                   role_id, failed_attempts, locked_at, last_login_at, created_at, updated_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn exists_by_email(&self, email: &str) -> DbResult<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    async fn exists_by_username(&self, username: &str) -> DbResult<bool> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM accounts WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    async fn create(&self, account: CreateAccount) -> DbResult<AccountRow> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts
                (username, email, password_hash, first_name, last_name, birth_date,
                 role_id, failed_attempts, locked_at, last_login_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 0, NULL, $8, $8, $8)
            RETURNING id, username, email, password_hash, first_name, last_name, birth_date,
                      role_id, failed_attempts, locked_at, last_login_at, created_at, updated_at
            "#,
        )
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.first_name)
        .bind(&account.last_name)
        .bind(account.birth_date)
        .bind(account.role_id)
        .bind(account.now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn record_failed_attempt(
        &self,
        id: i64,
        lock_threshold: i32,
        now: DateTime<Utc>,
    ) -> DbResult<AccountRow> {
        // Single statement so concurrent failures never lose an increment;
        // the lock stamp rides on the same write.
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            UPDATE accounts
            SET failed_attempts = failed_attempts + 1,
                locked_at = CASE
                    WHEN failed_attempts + 1 >= $2 AND locked_at IS NULL THEN $3
                    ELSE locked_at
                END,
                updated_at = $3
            WHERE id = $1
            RETURNING id, username, email, password_hash, first_name, last_name, birth_date,
                      role_id, failed_attempts, locked_at, last_login_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(lock_threshold)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn reset_lockout(&self, id: i64) -> DbResult<()> {
        sqlx::query(
            "UPDATE accounts SET failed_attempts = 0, locked_at = NULL, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn record_login(&self, id: i64, at: DateTime<Utc>) -> DbResult<()> {
        sqlx::query("UPDATE accounts SET last_login_at = $2, updated_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> DbResult<()> {
        sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

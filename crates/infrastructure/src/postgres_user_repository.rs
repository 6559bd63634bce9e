//! Postgres adapter for the user repository port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use cadre_application::{UserRecord, UserRepository};
use cadre_core::{AppError, AppResult};
use cadre_domain::UserId;

/// User repository backed by Postgres.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a repository over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    display_name: String,
    password_hash: String,
    email_verified: bool,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            email: row.email,
            display_name: row.display_name,
            password_hash: row.password_hash,
            email_verified: row.email_verified,
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, display_name, password_hash, email_verified
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve user: {error}")))?;

        Ok(row.map(UserRecord::from))
    }

    async fn find_by_subject(&self, subject: &str) -> AppResult<Option<UserRecord>> {
        let Ok(user_id) = Uuid::parse_str(subject) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, display_name, password_hash, email_verified
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve user: {error}")))?;

        Ok(row.map(UserRecord::from))
    }

    async fn insert_user(&self, user: &UserRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, display_name, password_hash, email_verified)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.display_name.as_str())
        .bind(user.password_hash.as_str())
        .bind(user.email_verified)
        .execute(&self.pool)
        .await
        .map_err(|error| map_email_conflict(error, user.email.as_str()))?;

        Ok(())
    }

    async fn mark_email_verified(&self, user_id: UserId) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET email_verified = true
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to mark email verified: {error}")))?;

        Ok(())
    }

    async fn store_verification_token(
        &self,
        user_id: UserId,
        token_digest: &str,
        expires_at: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO email_verification_tokens (token_digest, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(token_digest)
        .bind(user_id.as_uuid())
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to store verification token: {error}"))
        })?;

        Ok(())
    }

    async fn consume_verification_token(
        &self,
        token_digest: &str,
    ) -> AppResult<Option<UserId>> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            DELETE FROM email_verification_tokens
            WHERE token_digest = $1 AND expires_at > now()
            RETURNING user_id
            "#,
        )
        .bind(token_digest)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to consume verification token: {error}"))
        })?;

        Ok(user_id.map(UserId::from_uuid))
    }
}

fn map_email_conflict(error: sqlx::Error, email: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.is_unique_violation()
    {
        return AppError::Conflict(format!("an account already exists for '{email}'"));
    }

    AppError::Internal(format!("failed to insert user: {error}"))
}

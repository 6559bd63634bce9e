//! Postgres adapter for the preference repository port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use cadre_application::PreferenceRepository;
use cadre_core::{AppError, AppResult};
use cadre_domain::{SlackIntegration, UserPreferences};

/// Preference repository backed by Postgres.
#[derive(Clone)]
pub struct PostgresPreferenceRepository {
    pool: PgPool,
}

impl PostgresPreferenceRepository {
    /// Creates a repository over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PreferencesRow {
    timezone: Option<String>,
    language: Option<String>,
}

#[derive(sqlx::FromRow)]
struct SlackIntegrationRow {
    webhook_url: String,
    channel_name: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SlackIntegrationRow> for SlackIntegration {
    fn from(row: SlackIntegrationRow) -> Self {
        Self {
            webhook_url: row.webhook_url,
            channel_name: row.channel_name,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl PreferenceRepository for PostgresPreferenceRepository {
    async fn preferences_for(&self, subject: &str) -> AppResult<UserPreferences> {
        let row = sqlx::query_as::<_, PreferencesRow>(
            r#"
            SELECT timezone, language
            FROM user_preferences
            WHERE subject = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load preferences: {error}")))?;

        Ok(row
            .map(|row| UserPreferences {
                timezone: row.timezone,
                language: row.language,
            })
            .unwrap_or_default())
    }

    async fn save_preferences(
        &self,
        subject: &str,
        preferences: &UserPreferences,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (subject, timezone, language)
            VALUES ($1, $2, $3)
            ON CONFLICT (subject) DO UPDATE SET timezone = EXCLUDED.timezone,
                language = EXCLUDED.language
            "#,
        )
        .bind(subject)
        .bind(preferences.timezone.as_deref())
        .bind(preferences.language.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to save preferences: {error}")))?;

        Ok(())
    }

    async fn slack_integration_for(&self, subject: &str) -> AppResult<Option<SlackIntegration>> {
        let row = sqlx::query_as::<_, SlackIntegrationRow>(
            r#"
            SELECT webhook_url, channel_name, is_active, created_at, updated_at
            FROM slack_integrations
            WHERE subject = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load slack integration: {error}"))
        })?;

        Ok(row.map(SlackIntegration::from))
    }

    async fn upsert_slack_integration(
        &self,
        subject: &str,
        integration: &SlackIntegration,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO slack_integrations (
                subject, webhook_url, channel_name, is_active, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (subject) DO UPDATE SET webhook_url = EXCLUDED.webhook_url,
                channel_name = EXCLUDED.channel_name,
                is_active = EXCLUDED.is_active,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(subject)
        .bind(integration.webhook_url.as_str())
        .bind(integration.channel_name.as_deref())
        .bind(integration.is_active)
        .bind(integration.created_at)
        .bind(integration.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to save slack integration: {error}"))
        })?;

        Ok(())
    }

    async fn delete_slack_integration(&self, subject: &str) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM slack_integrations
            WHERE subject = $1
            "#,
        )
        .bind(subject)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete slack integration: {error}"))
        })?;

        Ok(result.rows_affected() > 0)
    }
}

//! Postgres adapter for the campaign repository port.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use cadre_application::{CampaignListFilter, CampaignRepository};
use cadre_core::{AppError, AppResult};
use cadre_domain::{Campaign, CampaignId, CampaignStatus, CampaignType};

/// Campaign repository backed by Postgres.
#[derive(Clone)]
pub struct PostgresCampaignRepository {
    pool: PgPool,
}

impl PostgresCampaignRepository {
    /// Creates a repository over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CampaignRow {
    id: Uuid,
    name: String,
    description: String,
    campaign_type: String,
    status: String,
    budget: Decimal,
    spent_amount: Decimal,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    owner_subject: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CampaignRow> for Campaign {
    type Error = AppError;

    fn try_from(row: CampaignRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CampaignId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            campaign_type: CampaignType::from_str(row.campaign_type.as_str())?,
            status: CampaignStatus::from_str(row.status.as_str())?,
            budget: row.budget,
            spent_amount: row.spent_amount,
            start_date: row.start_date,
            end_date: row.end_date,
            owner_subject: row.owner_subject,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl CampaignRepository for PostgresCampaignRepository {
    async fn insert(&self, campaign: &Campaign) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO campaigns (
                id, name, description, campaign_type, status, budget, spent_amount,
                start_date, end_date, owner_subject, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(campaign.id.as_uuid())
        .bind(campaign.name.as_str())
        .bind(campaign.description.as_str())
        .bind(campaign.campaign_type.as_str())
        .bind(campaign.status.as_str())
        .bind(campaign.budget)
        .bind(campaign.spent_amount)
        .bind(campaign.start_date)
        .bind(campaign.end_date)
        .bind(campaign.owner_subject.as_str())
        .bind(campaign.created_at)
        .bind(campaign.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to insert campaign: {error}")))?;

        Ok(())
    }

    async fn list(&self, filter: CampaignListFilter) -> AppResult<Vec<Campaign>> {
        let rows = sqlx::query_as::<_, CampaignRow>(
            r#"
            SELECT id, name, description, campaign_type, status, budget, spent_amount,
                start_date, end_date, owner_subject, created_at, updated_at
            FROM campaigns
            WHERE ($1::text IS NULL OR status = $1)
                AND ($2::text IS NULL OR campaign_type = $2)
                AND ($3::text IS NULL OR owner_subject = $3)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filter.status.map(|status| status.as_str()))
        .bind(filter.campaign_type.map(|kind| kind.as_str()))
        .bind(filter.owner_subject)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list campaigns: {error}")))?;

        rows.into_iter().map(Campaign::try_from).collect()
    }

    async fn find(&self, campaign_id: CampaignId) -> AppResult<Option<Campaign>> {
        let row = sqlx::query_as::<_, CampaignRow>(
            r#"
            SELECT id, name, description, campaign_type, status, budget, spent_amount,
                start_date, end_date, owner_subject, created_at, updated_at
            FROM campaigns
            WHERE id = $1
            "#,
        )
        .bind(campaign_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve campaign: {error}")))?;

        row.map(Campaign::try_from).transpose()
    }

    async fn update(&self, campaign: &Campaign) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE campaigns
            SET name = $2, description = $3, campaign_type = $4, status = $5,
                budget = $6, spent_amount = $7, start_date = $8, end_date = $9,
                updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(campaign.id.as_uuid())
        .bind(campaign.name.as_str())
        .bind(campaign.description.as_str())
        .bind(campaign.campaign_type.as_str())
        .bind(campaign.status.as_str())
        .bind(campaign.budget)
        .bind(campaign.spent_amount)
        .bind(campaign.start_date)
        .bind(campaign.end_date)
        .bind(campaign.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to update campaign: {error}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "campaign '{}' was not found",
                campaign.id
            )));
        }

        Ok(())
    }

    async fn delete(&self, campaign_id: CampaignId) -> AppResult<()> {
        sqlx::query(
            r#"
            DELETE FROM campaigns
            WHERE id = $1
            "#,
        )
        .bind(campaign_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete campaign: {error}")))?;

        Ok(())
    }
}

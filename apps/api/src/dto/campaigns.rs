use std::collections::BTreeMap;
use std::str::FromStr;

use cadre_application::CampaignDashboardStats;
use cadre_core::AppError;
use cadre_domain::{Campaign, CampaignInput, CampaignType};
use chrono::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a campaign.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/campaign-response.ts"
)]
pub struct CampaignResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub campaign_type: String,
    pub status: String,
    pub budget: String,
    pub spent_amount: String,
    pub start_date: String,
    pub end_date: String,
    pub owner_subject: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Incoming payload creating or updating a campaign.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/campaign-request.ts"
)]
pub struct CampaignRequest {
    pub name: String,
    pub description: Option<String>,
    pub campaign_type: String,
    pub budget: String,
    pub start_date: String,
    pub end_date: String,
}

/// Incoming payload moving a campaign through the workflow.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/update-campaign-status-request.ts"
)]
pub struct UpdateCampaignStatusRequest {
    pub status: String,
}

/// Aggregate dashboard payload.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/campaign-dashboard-stats-response.ts"
)]
pub struct CampaignDashboardStatsResponse {
    pub total: u64,
    pub by_status: BTreeMap<String, u64>,
    pub total_budget: String,
    pub active_budget: String,
    pub total_spent: String,
}

impl From<Campaign> for CampaignResponse {
    fn from(value: Campaign) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            description: value.description,
            campaign_type: value.campaign_type.as_str().to_owned(),
            status: value.status.as_str().to_owned(),
            budget: value.budget.to_string(),
            spent_amount: value.spent_amount.to_string(),
            start_date: value.start_date.to_rfc3339(),
            end_date: value.end_date.to_rfc3339(),
            owner_subject: value.owner_subject,
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<CampaignRequest> for CampaignInput {
    type Error = AppError;

    fn try_from(value: CampaignRequest) -> Result<Self, Self::Error> {
        let budget = Decimal::from_str(value.budget.as_str())
            .map_err(|error| AppError::Validation(format!("invalid budget: {error}")))?;

        Ok(Self {
            name: value.name,
            description: value.description.unwrap_or_default(),
            campaign_type: CampaignType::from_str(value.campaign_type.as_str())?,
            budget,
            start_date: parse_timestamp(value.start_date.as_str(), "startDate")?,
            end_date: parse_timestamp(value.end_date.as_str(), "endDate")?,
        })
    }
}

impl From<CampaignDashboardStats> for CampaignDashboardStatsResponse {
    fn from(value: CampaignDashboardStats) -> Self {
        Self {
            total: value.total as u64,
            by_status: value
                .by_status
                .into_iter()
                .map(|(status, count)| (status, count as u64))
                .collect(),
            total_budget: value.total_budget.to_string(),
            active_budget: value.active_budget.to_string(),
            total_spent: value.total_spent.to_string(),
        }
    }
}

fn parse_timestamp(
    value: &str,
    field: &str,
) -> Result<chrono::DateTime<chrono::Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&chrono::Utc))
        .map_err(|error| AppError::Validation(format!("invalid {field}: {error}")))
}

#[cfg(test)]
mod tests {
    use cadre_domain::{CampaignInput, CampaignType};

    use super::CampaignRequest;

    fn request() -> CampaignRequest {
        CampaignRequest {
            name: "Spring Launch".to_owned(),
            description: None,
            campaign_type: "social_media".to_owned(),
            budget: "25000.00".to_owned(),
            start_date: "2025-03-01T00:00:00Z".to_owned(),
            end_date: "2025-04-01T00:00:00Z".to_owned(),
        }
    }

    #[test]
    fn request_converts_to_validated_input() {
        let input = CampaignInput::try_from(request());
        assert!(input.is_ok_and(|input| input.campaign_type == CampaignType::SocialMedia));
    }

    #[test]
    fn malformed_budget_is_rejected() {
        let mut bad = request();
        bad.budget = "lots".to_owned();
        assert!(CampaignInput::try_from(bad).is_err());
    }

    #[test]
    fn malformed_timestamp_is_rejected() {
        let mut bad = request();
        bad.start_date = "March 1st".to_owned();
        assert!(CampaignInput::try_from(bad).is_err());
    }
}

//! Application service for campaign administration.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use cadre_core::{AppError, AppResult, UserIdentity};
use cadre_domain::{AuditAction, Campaign, CampaignId, CampaignInput, CampaignStatus};

use crate::audit_ports::{AuditEvent, AuditRepository};
use crate::campaign_ports::{CampaignListFilter, CampaignRepository};

/// Aggregate numbers for the campaign dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignDashboardStats {
    /// Total number of campaigns.
    pub total: usize,
    /// Campaign count per workflow state storage value.
    pub by_status: BTreeMap<String, usize>,
    /// Budget summed over all campaigns.
    pub total_budget: Decimal,
    /// Budget summed over active campaigns.
    pub active_budget: Decimal,
    /// Spend summed over all campaigns.
    pub total_spent: Decimal,
}

/// Application service for campaign CRUD and the status workflow.
#[derive(Clone)]
pub struct CampaignService {
    repository: Arc<dyn CampaignRepository>,
    audit_repository: Arc<dyn AuditRepository>,
}

impl CampaignService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        repository: Arc<dyn CampaignRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        Self {
            repository,
            audit_repository,
        }
    }

    /// Creates a campaign in Draft for the acting user.
    pub async fn create(&self, actor: &UserIdentity, input: CampaignInput) -> AppResult<Campaign> {
        input.validate()?;

        let now = Utc::now();
        let campaign = Campaign {
            id: CampaignId::new(),
            name: input.name,
            description: input.description,
            campaign_type: input.campaign_type,
            status: CampaignStatus::Draft,
            budget: input.budget,
            spent_amount: Decimal::ZERO,
            start_date: input.start_date,
            end_date: input.end_date,
            owner_subject: actor.subject().to_owned(),
            created_at: now,
            updated_at: now,
        };

        self.repository.insert(&campaign).await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::CampaignCreated,
                resource_type: "campaign".to_owned(),
                resource_id: campaign.id.to_string(),
                detail: Some(format!("created campaign '{}'", campaign.name)),
            })
            .await?;

        Ok(campaign)
    }

    /// Lists campaigns newest first, honoring the filter.
    pub async fn list(&self, filter: CampaignListFilter) -> AppResult<Vec<Campaign>> {
        self.repository.list(filter).await
    }

    /// Returns one campaign.
    pub async fn get(&self, campaign_id: CampaignId) -> AppResult<Campaign> {
        self.require_campaign(campaign_id).await
    }

    /// Updates a campaign's mutable fields.
    ///
    /// Terminal campaigns are frozen; editing one is a conflict.
    pub async fn update(
        &self,
        actor: &UserIdentity,
        campaign_id: CampaignId,
        input: CampaignInput,
    ) -> AppResult<Campaign> {
        input.validate()?;

        let mut campaign = self.require_campaign(campaign_id).await?;
        if matches!(
            campaign.status,
            CampaignStatus::Completed | CampaignStatus::Cancelled
        ) {
            return Err(AppError::Conflict(format!(
                "campaign '{}' is {} and can no longer be edited",
                campaign.name,
                campaign.status.as_str()
            )));
        }

        campaign.name = input.name;
        campaign.description = input.description;
        campaign.campaign_type = input.campaign_type;
        campaign.budget = input.budget;
        campaign.start_date = input.start_date;
        campaign.end_date = input.end_date;
        campaign.updated_at = Utc::now();

        self.repository.update(&campaign).await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::CampaignUpdated,
                resource_type: "campaign".to_owned(),
                resource_id: campaign.id.to_string(),
                detail: Some(format!("updated campaign '{}'", campaign.name)),
            })
            .await?;

        Ok(campaign)
    }

    /// Moves a campaign to a new workflow state.
    pub async fn change_status(
        &self,
        actor: &UserIdentity,
        campaign_id: CampaignId,
        next: CampaignStatus,
    ) -> AppResult<Campaign> {
        let mut campaign = self.require_campaign(campaign_id).await?;

        if !campaign.status.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "campaign '{}' cannot move from {} to {}",
                campaign.name,
                campaign.status.as_str(),
                next.as_str()
            )));
        }

        let previous = campaign.status;
        campaign.status = next;
        campaign.updated_at = Utc::now();

        self.repository.update(&campaign).await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::CampaignStatusChanged,
                resource_type: "campaign".to_owned(),
                resource_id: campaign.id.to_string(),
                detail: Some(format!(
                    "moved campaign '{}' from {} to {}",
                    campaign.name,
                    previous.as_str(),
                    next.as_str()
                )),
            })
            .await?;

        Ok(campaign)
    }

    /// Deletes a draft campaign. Anything past Draft must be cancelled
    /// instead, keeping its history.
    pub async fn delete(&self, actor: &UserIdentity, campaign_id: CampaignId) -> AppResult<()> {
        let campaign = self.require_campaign(campaign_id).await?;

        if campaign.status != CampaignStatus::Draft {
            return Err(AppError::Conflict(format!(
                "only draft campaigns can be deleted; cancel '{}' instead",
                campaign.name
            )));
        }

        self.repository.delete(campaign_id).await?;

        self.audit_repository
            .append_event(AuditEvent {
                subject: actor.subject().to_owned(),
                action: AuditAction::CampaignDeleted,
                resource_type: "campaign".to_owned(),
                resource_id: campaign_id.to_string(),
                detail: Some(format!("deleted draft campaign '{}'", campaign.name)),
            })
            .await
    }

    /// Returns aggregate dashboard numbers over all campaigns.
    pub async fn dashboard_stats(&self) -> AppResult<CampaignDashboardStats> {
        let campaigns = self.repository.list(CampaignListFilter::default()).await?;

        let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_budget = Decimal::ZERO;
        let mut active_budget = Decimal::ZERO;
        let mut total_spent = Decimal::ZERO;

        for campaign in &campaigns {
            *by_status
                .entry(campaign.status.as_str().to_owned())
                .or_default() += 1;
            total_budget += campaign.budget;
            total_spent += campaign.spent_amount;
            if campaign.status == CampaignStatus::Active {
                active_budget += campaign.budget;
            }
        }

        Ok(CampaignDashboardStats {
            total: campaigns.len(),
            by_status,
            total_budget,
            active_budget,
            total_spent,
        })
    }

    async fn require_campaign(&self, campaign_id: CampaignId) -> AppResult<Campaign> {
        self.repository
            .find(campaign_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("campaign '{campaign_id}' was not found"))
            })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use tokio::sync::Mutex;

    use cadre_core::{AppError, AppResult, UserIdentity};
    use cadre_domain::{Campaign, CampaignId, CampaignInput, CampaignStatus, CampaignType};

    use crate::audit_ports::{AuditEvent, AuditRepository};
    use crate::campaign_ports::{CampaignListFilter, CampaignRepository};

    use super::CampaignService;

    #[derive(Default)]
    struct FakeCampaignRepository {
        campaigns: Mutex<Vec<Campaign>>,
    }

    #[async_trait]
    impl CampaignRepository for FakeCampaignRepository {
        async fn insert(&self, campaign: &Campaign) -> AppResult<()> {
            self.campaigns.lock().await.push(campaign.clone());
            Ok(())
        }

        async fn list(&self, filter: CampaignListFilter) -> AppResult<Vec<Campaign>> {
            let campaigns = self.campaigns.lock().await;
            Ok(campaigns
                .iter()
                .filter(|campaign| {
                    filter
                        .status
                        .is_none_or(|status| campaign.status == status)
                        && filter
                            .campaign_type
                            .is_none_or(|kind| campaign.campaign_type == kind)
                        && filter
                            .owner_subject
                            .as_deref()
                            .is_none_or(|owner| campaign.owner_subject == owner)
                })
                .cloned()
                .collect())
        }

        async fn find(&self, campaign_id: CampaignId) -> AppResult<Option<Campaign>> {
            let campaigns = self.campaigns.lock().await;
            Ok(campaigns
                .iter()
                .find(|campaign| campaign.id == campaign_id)
                .cloned())
        }

        async fn update(&self, campaign: &Campaign) -> AppResult<()> {
            let mut campaigns = self.campaigns.lock().await;
            for stored in campaigns.iter_mut() {
                if stored.id == campaign.id {
                    *stored = campaign.clone();
                }
            }
            Ok(())
        }

        async fn delete(&self, campaign_id: CampaignId) -> AppResult<()> {
            self.campaigns
                .lock()
                .await
                .retain(|campaign| campaign.id != campaign_id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeAuditRepository {
        events: Mutex<Vec<AuditEvent>>,
    }

    #[async_trait]
    impl AuditRepository for FakeAuditRepository {
        async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
            self.events.lock().await.push(event);
            Ok(())
        }
    }

    fn actor() -> UserIdentity {
        UserIdentity::new("alice", "Alice", None)
    }

    fn input() -> CampaignInput {
        CampaignInput {
            name: "Spring Launch".to_owned(),
            description: String::new(),
            campaign_type: CampaignType::SocialMedia,
            budget: Decimal::new(10_000, 0),
            start_date: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).single().unwrap_or_default(),
            end_date: Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).single().unwrap_or_default(),
        }
    }

    fn service() -> (Arc<FakeCampaignRepository>, Arc<FakeAuditRepository>, CampaignService) {
        let repository = Arc::new(FakeCampaignRepository::default());
        let audit_repository = Arc::new(FakeAuditRepository::default());
        let service = CampaignService::new(repository.clone(), audit_repository.clone());
        (repository, audit_repository, service)
    }

    #[tokio::test]
    async fn create_starts_in_draft_with_zero_spend() {
        let (_, audit_repository, service) = service();

        let campaign = service.create(&actor(), input()).await;

        assert!(campaign.is_ok_and(|campaign| {
            campaign.status == CampaignStatus::Draft && campaign.spent_amount.is_zero()
        }));
        assert_eq!(audit_repository.events.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_before_insert() {
        let (repository, _, service) = service();

        let mut bad = input();
        bad.budget = Decimal::ZERO;
        let result = service.create(&actor(), bad).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(repository.campaigns.lock().await.is_empty());
    }

    #[tokio::test]
    async fn legal_transition_is_applied_and_audited() {
        let (_, audit_repository, service) = service();
        let campaign = match service.create(&actor(), input()).await {
            Ok(campaign) => campaign,
            Err(error) => panic!("create failed: {error}"),
        };

        let activated = service
            .change_status(&actor(), campaign.id, CampaignStatus::Active)
            .await;

        assert!(activated.is_ok_and(|campaign| campaign.status == CampaignStatus::Active));
        assert_eq!(audit_repository.events.lock().await.len(), 2);
    }

    #[tokio::test]
    async fn illegal_transition_is_a_conflict() {
        let (_, _, service) = service();
        let campaign = match service.create(&actor(), input()).await {
            Ok(campaign) => campaign,
            Err(error) => panic!("create failed: {error}"),
        };

        let result = service
            .change_status(&actor(), campaign.id, CampaignStatus::Completed)
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn non_draft_campaign_cannot_be_deleted() {
        let (repository, _, service) = service();
        let campaign = match service.create(&actor(), input()).await {
            Ok(campaign) => campaign,
            Err(error) => panic!("create failed: {error}"),
        };
        let _ = service
            .change_status(&actor(), campaign.id, CampaignStatus::Active)
            .await;

        let result = service.delete(&actor(), campaign.id).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(repository.campaigns.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn terminal_campaign_cannot_be_edited() {
        let (_, _, service) = service();
        let campaign = match service.create(&actor(), input()).await {
            Ok(campaign) => campaign,
            Err(error) => panic!("create failed: {error}"),
        };
        let _ = service
            .change_status(&actor(), campaign.id, CampaignStatus::Cancelled)
            .await;

        let result = service.update(&actor(), campaign.id, input()).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn dashboard_stats_aggregate_by_status() {
        let (_, _, service) = service();
        let first = match service.create(&actor(), input()).await {
            Ok(campaign) => campaign,
            Err(error) => panic!("create failed: {error}"),
        };
        let _ = service.create(&actor(), input()).await;
        let _ = service
            .change_status(&actor(), first.id, CampaignStatus::Active)
            .await;

        let stats = service.dashboard_stats().await;

        assert!(stats.is_ok_and(|stats| {
            stats.total == 2
                && stats.by_status.get("draft") == Some(&1)
                && stats.by_status.get("active") == Some(&1)
                && stats.active_budget == Decimal::new(10_000, 0)
                && stats.total_budget == Decimal::new(20_000, 0)
        }));
    }
}

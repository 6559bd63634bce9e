//! Repository port for campaign administration.

use async_trait::async_trait;

use cadre_core::AppResult;
use cadre_domain::{Campaign, CampaignId, CampaignStatus, CampaignType};

/// Filter for campaign listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignListFilter {
    /// Restrict to one workflow state.
    pub status: Option<CampaignStatus>,
    /// Restrict to one channel.
    pub campaign_type: Option<CampaignType>,
    /// Restrict to campaigns owned by one subject.
    pub owner_subject: Option<String>,
}

/// Repository port for campaign records.
#[async_trait]
pub trait CampaignRepository: Send + Sync {
    /// Persists a new campaign.
    async fn insert(&self, campaign: &Campaign) -> AppResult<()>;

    /// Lists campaigns newest first, honoring the filter.
    async fn list(&self, filter: CampaignListFilter) -> AppResult<Vec<Campaign>>;

    /// Finds one campaign by id.
    async fn find(&self, campaign_id: CampaignId) -> AppResult<Option<Campaign>>;

    /// Overwrites an existing campaign record.
    async fn update(&self, campaign: &Campaign) -> AppResult<()>;

    /// Deletes one campaign record.
    async fn delete(&self, campaign_id: CampaignId) -> AppResult<()>;
}

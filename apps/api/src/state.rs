use cadre_application::{
    AccessControlService, ApproverService, CampaignService, PreferenceService, UserService,
};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_service: AccessControlService,
    pub approver_service: ApproverService,
    pub campaign_service: CampaignService,
    pub preference_service: PreferenceService,
    pub user_service: UserService,
    pub pool: PgPool,
    pub frontend_url: String,
}

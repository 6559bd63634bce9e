//! Wires repositories and services into the shared application state.

use std::sync::Arc;

use sqlx::PgPool;

use cadre_application::{
    AccessControlRepository, AccessControlService, ApproverService, CampaignService,
    PreferenceService, UserService,
};
use cadre_infrastructure::{
    Argon2PasswordHasher, ConsoleMailer, InMemoryAccessRepository, PostgresAccessRepository,
    PostgresApproverRepository, PostgresAuditRepository, PostgresCampaignRepository,
    PostgresPreferenceRepository, PostgresUserRepository, SlackWebhookNotifier,
};
use tracing::warn;

use crate::api_config::ApiConfig;
use crate::state::AppState;

/// Builds the shared application state over a connection pool.
pub fn build_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let audit_repository = Arc::new(PostgresAuditRepository::new(pool.clone()));

    let access_repository: Arc<dyn AccessControlRepository> = if config.mock_access_data {
        warn!("MOCK_ACCESS_DATA is enabled; serving the access catalog from fixture data");
        Arc::new(InMemoryAccessRepository::with_fixture_data())
    } else {
        Arc::new(PostgresAccessRepository::new(pool.clone()))
    };

    let access_service = AccessControlService::new(
        access_repository,
        audit_repository.clone(),
        audit_repository.clone(),
    );

    let approver_service = ApproverService::new(
        Arc::new(PostgresApproverRepository::new(pool.clone())),
        audit_repository.clone(),
    );

    let campaign_service = CampaignService::new(
        Arc::new(PostgresCampaignRepository::new(pool.clone())),
        audit_repository,
    );

    let preference_service = PreferenceService::new(
        Arc::new(PostgresPreferenceRepository::new(pool.clone())),
        Arc::new(SlackWebhookNotifier::new(reqwest::Client::new())),
    );

    let user_service = UserService::new(
        Arc::new(PostgresUserRepository::new(pool.clone())),
        Arc::new(Argon2PasswordHasher::new()),
        Arc::new(ConsoleMailer::new()),
    );

    AppState {
        access_service,
        approver_service,
        campaign_service,
        preference_service,
        user_service,
        pool,
        frontend_url: config.frontend_url.clone(),
    }
}

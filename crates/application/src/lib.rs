//! Application services and ports.

#![forbid(unsafe_code)]

mod access_ports;
mod access_service;
mod approver_ports;
mod approver_service;
mod audit_ports;
mod campaign_ports;
mod campaign_service;
mod preference_ports;
mod preference_service;
mod user_ports;
mod user_service;

pub use access_ports::{AccessControlRepository, PermissionGrant};
pub use access_service::{AccessControlService, SavedRolePermissions};
pub use approver_ports::{ApproverRepository, ApproverUserFilter};
pub use approver_service::ApproverService;
pub use audit_ports::{
    AuditEvent, AuditLogEntry, AuditLogQuery, AuditLogRepository, AuditRepository,
};
pub use campaign_ports::{CampaignListFilter, CampaignRepository};
pub use campaign_service::{CampaignDashboardStats, CampaignService};
pub use preference_ports::{PreferenceRepository, SlackNotifier};
pub use preference_service::{PreferenceService, SlackIntegrationInput};
pub use user_ports::{Mailer, PasswordHasher, UserRecord, UserRepository};
pub use user_service::{AuthOutcome, RegisterParams, UserService};

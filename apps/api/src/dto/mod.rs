mod access;
mod approvers;
mod auth;
mod campaigns;
mod common;
mod preferences;

pub use access::{
    AuditLogEntryResponse, CopyRolePermissionsRequest, OrganizationResponse,
    PermissionGrantRequest, PermissionResponse, RolePermissionResponse, RoleResponse,
    SaveRolePermissionsRequest, SaveRolePermissionsResponse, TeamResponse,
};
pub use approvers::{ApproverUserResponse, ModuleResponse, ReplaceModuleApproversRequest};
pub use auth::{AuthLoginRequest, AuthRegisterRequest, VerifyEmailRequest};
pub use campaigns::{
    CampaignDashboardStatsResponse, CampaignRequest, CampaignResponse,
    UpdateCampaignStatusRequest,
};
pub use common::{GenericMessageResponse, HealthResponse, UserIdentityResponse};
pub use preferences::{
    SaveSlackIntegrationRequest, SlackIntegrationResponse, UserPreferencesPayload,
};

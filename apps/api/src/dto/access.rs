use cadre_application::{AuditLogEntry, SavedRolePermissions};
use cadre_domain::{Organization, Permission, Role, RolePermissionEntry, Team};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of an organization.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/organization-response.ts"
)]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
}

/// API representation of a team.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/team-response.ts"
)]
pub struct TeamResponse {
    pub id: String,
    pub name: String,
    pub organization_id: String,
}

/// API representation of a role.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/role-response.ts"
)]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rank: i32,
    pub is_read_only: bool,
}

/// API representation of a permission.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub module: String,
    pub action: String,
}

/// API representation of one role-permission entry.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/role-permission-response.ts"
)]
pub struct RolePermissionResponse {
    pub role_id: String,
    pub permission_id: String,
    pub granted: bool,
}

/// One submitted grant inside a save request.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/permission-grant-request.ts"
)]
pub struct PermissionGrantRequest {
    pub permission_id: String,
    pub granted: bool,
}

/// Incoming payload replacing a role's permission list.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/save-role-permissions-request.ts"
)]
pub struct SaveRolePermissionsRequest {
    pub permissions: Vec<PermissionGrantRequest>,
}

/// Result payload for a role-permission save.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/save-role-permissions-response.ts"
)]
pub struct SaveRolePermissionsResponse {
    pub changed: bool,
    pub entries: Vec<RolePermissionResponse>,
}

/// Incoming payload copying one role's permissions onto another.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/copy-role-permissions-request.ts"
)]
pub struct CopyRolePermissionsRequest {
    pub from_role_id: String,
}

/// API representation of an audit log entry.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/audit-log-entry-response.ts"
)]
pub struct AuditLogEntryResponse {
    pub event_id: String,
    pub subject: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub detail: Option<String>,
    pub created_at: String,
}

impl From<Organization> for OrganizationResponse {
    fn from(value: Organization) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
        }
    }
}

impl From<Team> for TeamResponse {
    fn from(value: Team) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            organization_id: value.organization_id.to_string(),
        }
    }
}

impl From<Role> for RoleResponse {
    fn from(value: Role) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            description: value.description,
            rank: value.rank,
            is_read_only: value.is_read_only,
        }
    }
}

impl From<Permission> for PermissionResponse {
    fn from(value: Permission) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            description: value.description,
            module: value.module,
            action: value.action.as_str().to_owned(),
        }
    }
}

impl From<RolePermissionEntry> for RolePermissionResponse {
    fn from(value: RolePermissionEntry) -> Self {
        Self {
            role_id: value.role_id.to_string(),
            permission_id: value.permission_id.to_string(),
            granted: value.granted,
        }
    }
}

impl From<SavedRolePermissions> for SaveRolePermissionsResponse {
    fn from(value: SavedRolePermissions) -> Self {
        Self {
            changed: value.changed,
            entries: value
                .entries
                .into_iter()
                .map(RolePermissionResponse::from)
                .collect(),
        }
    }
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(value: AuditLogEntry) -> Self {
        Self {
            event_id: value.event_id,
            subject: value.subject,
            action: value.action,
            resource_type: value.resource_type,
            resource_id: value.resource_id,
            detail: value.detail,
            created_at: value.created_at,
        }
    }
}

//! Repository port for access-control administration.

use async_trait::async_trait;

use cadre_core::AppResult;
use cadre_domain::{
    Organization, OrganizationId, Permission, PermissionId, Role, RoleId, RolePermissionEntry,
    Team,
};

/// One submitted grant in a role-permission save request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionGrant {
    /// Permission the grant applies to.
    pub permission_id: PermissionId,
    /// Whether the role should hold the permission.
    pub granted: bool,
}

/// Repository port for organizations, teams, roles and the stored
/// role-permission entry list.
#[async_trait]
pub trait AccessControlRepository: Send + Sync {
    /// Lists all organizations.
    async fn list_organizations(&self) -> AppResult<Vec<Organization>>;

    /// Lists teams, optionally scoped to one organization.
    async fn list_teams(&self, organization_id: Option<OrganizationId>) -> AppResult<Vec<Team>>;

    /// Lists all roles.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Finds one role by id.
    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>>;

    /// Lists all permissions.
    async fn list_permissions(&self) -> AppResult<Vec<Permission>>;

    /// Lists stored role-permission entries, optionally scoped to one
    /// role. At most one entry per (role, permission) pair.
    async fn list_role_permissions(
        &self,
        role_id: Option<RoleId>,
    ) -> AppResult<Vec<RolePermissionEntry>>;

    /// Replaces the stored entry set for one role wholesale.
    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        entries: &[RolePermissionEntry],
    ) -> AppResult<()>;
}

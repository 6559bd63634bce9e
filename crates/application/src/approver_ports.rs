//! Repository port for the module approver feature.

use async_trait::async_trait;
use uuid::Uuid;

use cadre_core::AppResult;
use cadre_domain::{ApproverUser, ModuleDefinition, OrganizationId, TeamId};

/// Filter for listing approver candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApproverUserFilter {
    /// Restrict to one organization.
    pub organization_id: Option<OrganizationId>,
    /// Restrict to one team.
    pub team_id: Option<TeamId>,
}

/// Repository port for modules and their approver sets.
#[async_trait]
pub trait ApproverRepository: Send + Sync {
    /// Lists all modules.
    async fn list_modules(&self) -> AppResult<Vec<ModuleDefinition>>;

    /// Finds one module by slug.
    async fn find_module(&self, module_id: &str) -> AppResult<Option<ModuleDefinition>>;

    /// Lists users eligible as approvers, optionally scoped.
    async fn list_approver_users(
        &self,
        filter: ApproverUserFilter,
    ) -> AppResult<Vec<ApproverUser>>;

    /// Resolves users by id. Unknown ids are simply absent from the
    /// result.
    async fn find_users_by_ids(&self, user_ids: &[Uuid]) -> AppResult<Vec<ApproverUser>>;

    /// Returns the approver set bound to one module.
    async fn approvers_for_module(&self, module_id: &str) -> AppResult<Vec<ApproverUser>>;

    /// Replaces the module's approver set wholesale.
    async fn replace_module_approvers(
        &self,
        module_id: &str,
        user_ids: &[Uuid],
    ) -> AppResult<()>;
}

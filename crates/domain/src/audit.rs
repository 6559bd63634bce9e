//! Stable audit actions emitted by application use-cases.

use serde::{Deserialize, Serialize};

/// Actions recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a role's permission set is saved with real changes.
    RolePermissionsSaved,
    /// Emitted when one role's permission set is copied onto another.
    RolePermissionsCopied,
    /// Emitted when a module's approver set is replaced.
    ModuleApproversReplaced,
    /// Emitted when a campaign is created.
    CampaignCreated,
    /// Emitted when a campaign's mutable fields are updated.
    CampaignUpdated,
    /// Emitted when a campaign moves to a new workflow state.
    CampaignStatusChanged,
    /// Emitted when a draft campaign is deleted.
    CampaignDeleted,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RolePermissionsSaved => "access.role_permissions.saved",
            Self::RolePermissionsCopied => "access.role_permissions.copied",
            Self::ModuleApproversReplaced => "approver.module_set.replaced",
            Self::CampaignCreated => "campaign.created",
            Self::CampaignUpdated => "campaign.updated",
            Self::CampaignStatusChanged => "campaign.status_changed",
            Self::CampaignDeleted => "campaign.deleted",
        }
    }
}

//! Module approver entities.
//!
//! Approvers are a simpler, parallel binding to the role/permission
//! matrix: a plain set of users attached to a functional module, replaced
//! wholesale on every save. No ranking, no inheritance.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::access::{OrganizationId, TeamId};

/// A functional area that groups permissions and may require approver
/// sign-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDefinition {
    /// Stable module slug, e.g. "asset_management".
    pub id: String,
    /// Display name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Whether actions in this module need approver sign-off. Gates only
    /// whether an approver set is meaningful for the module.
    pub requires_approval: bool,
}

/// A user eligible to be bound as a module approver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproverUser {
    /// Stable user identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Optional avatar URL.
    pub avatar_url: Option<String>,
    /// Organization the user belongs to.
    pub organization_id: OrganizationId,
    /// Team the user belongs to.
    pub team_id: TeamId,
}

/// The approver set currently bound to a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleApproverBinding {
    /// Module the set is bound to.
    pub module_id: String,
    /// User ids in the set. No duplicates in a consistent snapshot.
    pub approver_ids: Vec<Uuid>,
}

use cadre_domain::{ApproverUser, ModuleDefinition};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of a functional module.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/module-response.ts"
)]
pub struct ModuleResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub requires_approval: bool,
}

/// API representation of an approver candidate.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/approver-user-response.ts"
)]
pub struct ApproverUserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub organization_id: String,
    pub team_id: String,
}

/// Incoming payload replacing a module's approver set wholesale.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/replace-module-approvers-request.ts"
)]
pub struct ReplaceModuleApproversRequest {
    pub approver_ids: Vec<String>,
}

impl From<ModuleDefinition> for ModuleResponse {
    fn from(value: ModuleDefinition) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            requires_approval: value.requires_approval,
        }
    }
}

impl From<ApproverUser> for ApproverUserResponse {
    fn from(value: ApproverUser) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name,
            email: value.email,
            avatar_url: value.avatar_url,
            organization_id: value.organization_id.to_string(),
            team_id: value.team_id.to_string(),
        }
    }
}

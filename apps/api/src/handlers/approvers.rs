use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use serde::Deserialize;

use cadre_application::ApproverUserFilter;
use cadre_core::UserIdentity;
use cadre_domain::{OrganizationId, TeamId};

use crate::dto::{ApproverUserResponse, ModuleResponse, ReplaceModuleApproversRequest};
use crate::error::ApiResult;
use crate::state::AppState;

use super::parse_uuid;

#[derive(Debug, Deserialize)]
pub struct ApproverUsersQuery {
    pub organization_id: Option<String>,
    pub team_id: Option<String>,
}

pub async fn list_modules_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ModuleResponse>>> {
    let modules = state
        .approver_service
        .list_modules()
        .await?
        .into_iter()
        .map(ModuleResponse::from)
        .collect();

    Ok(Json(modules))
}

pub async fn list_approver_users_handler(
    State(state): State<AppState>,
    Query(query): Query<ApproverUsersQuery>,
) -> ApiResult<Json<Vec<ApproverUserResponse>>> {
    let filter = ApproverUserFilter {
        organization_id: query
            .organization_id
            .as_deref()
            .map(|value| parse_uuid(value, "organization id").map(OrganizationId::from_uuid))
            .transpose()?,
        team_id: query
            .team_id
            .as_deref()
            .map(|value| parse_uuid(value, "team id").map(TeamId::from_uuid))
            .transpose()?,
    };

    let users = state
        .approver_service
        .list_approver_users(filter)
        .await?
        .into_iter()
        .map(ApproverUserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn module_approvers_handler(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> ApiResult<Json<Vec<ApproverUserResponse>>> {
    let approvers = state
        .approver_service
        .module_approvers(module_id.as_str())
        .await?
        .into_iter()
        .map(ApproverUserResponse::from)
        .collect();

    Ok(Json(approvers))
}

pub async fn replace_module_approvers_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(module_id): Path<String>,
    Json(payload): Json<ReplaceModuleApproversRequest>,
) -> ApiResult<Json<Vec<ApproverUserResponse>>> {
    let approver_ids = payload
        .approver_ids
        .iter()
        .map(|value| parse_uuid(value.as_str(), "approver user id"))
        .collect::<Result<Vec<_>, _>>()?;

    let approvers = state
        .approver_service
        .replace_module_approvers(&user, module_id.as_str(), approver_ids)
        .await?
        .into_iter()
        .map(ApproverUserResponse::from)
        .collect();

    Ok(Json(approvers))
}

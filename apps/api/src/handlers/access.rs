use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use serde::Deserialize;

use cadre_application::{AuditLogQuery, PermissionGrant};
use cadre_core::UserIdentity;
use cadre_domain::{OrganizationId, PermissionId, RoleId};

use crate::dto::{
    AuditLogEntryResponse, CopyRolePermissionsRequest, OrganizationResponse, PermissionResponse,
    RolePermissionResponse, RoleResponse, SaveRolePermissionsRequest,
    SaveRolePermissionsResponse, TeamResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::parse_uuid;

#[derive(Debug, Deserialize)]
pub struct TeamsQuery {
    pub organization_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RolePermissionsQuery {
    pub role_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AuditLogQueryParams {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

pub async fn list_organizations_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<OrganizationResponse>>> {
    let organizations = state
        .access_service
        .list_organizations()
        .await?
        .into_iter()
        .map(OrganizationResponse::from)
        .collect();

    Ok(Json(organizations))
}

pub async fn list_teams_handler(
    State(state): State<AppState>,
    Query(query): Query<TeamsQuery>,
) -> ApiResult<Json<Vec<TeamResponse>>> {
    let organization_id = query
        .organization_id
        .as_deref()
        .map(|value| parse_uuid(value, "organization id").map(OrganizationId::from_uuid))
        .transpose()?;

    let teams = state
        .access_service
        .list_teams(organization_id)
        .await?
        .into_iter()
        .map(TeamResponse::from)
        .collect();

    Ok(Json(teams))
}

pub async fn list_roles_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<RoleResponse>>> {
    let roles = state
        .access_service
        .list_roles()
        .await?
        .into_iter()
        .map(RoleResponse::from)
        .collect();

    Ok(Json(roles))
}

pub async fn list_permissions_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PermissionResponse>>> {
    let permissions = state
        .access_service
        .list_permissions()
        .await?
        .into_iter()
        .map(PermissionResponse::from)
        .collect();

    Ok(Json(permissions))
}

pub async fn list_role_permissions_handler(
    State(state): State<AppState>,
    Query(query): Query<RolePermissionsQuery>,
) -> ApiResult<Json<Vec<RolePermissionResponse>>> {
    let role_id = query
        .role_id
        .as_deref()
        .map(|value| parse_uuid(value, "role id").map(RoleId::from_uuid))
        .transpose()?;

    let entries = state
        .access_service
        .list_role_permissions(role_id)
        .await?
        .into_iter()
        .map(RolePermissionResponse::from)
        .collect();

    Ok(Json(entries))
}

pub async fn save_role_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
    Json(payload): Json<SaveRolePermissionsRequest>,
) -> ApiResult<Json<SaveRolePermissionsResponse>> {
    let role_id = RoleId::from_uuid(parse_uuid(role_id.as_str(), "role id")?);

    let grants = payload
        .permissions
        .into_iter()
        .map(|grant| {
            parse_uuid(grant.permission_id.as_str(), "permission id").map(|permission_id| {
                PermissionGrant {
                    permission_id: PermissionId::from_uuid(permission_id),
                    granted: grant.granted,
                }
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let saved = state
        .access_service
        .save_role_permissions(&user, role_id, grants)
        .await?;

    Ok(Json(SaveRolePermissionsResponse::from(saved)))
}

pub async fn copy_role_permissions_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(role_id): Path<String>,
    Json(payload): Json<CopyRolePermissionsRequest>,
) -> ApiResult<Json<Vec<RolePermissionResponse>>> {
    let destination = RoleId::from_uuid(parse_uuid(role_id.as_str(), "role id")?);
    let source = RoleId::from_uuid(parse_uuid(payload.from_role_id.as_str(), "role id")?);

    let entries = state
        .access_service
        .copy_role_permissions(&user, source, destination)
        .await?
        .into_iter()
        .map(RolePermissionResponse::from)
        .collect();

    Ok(Json(entries))
}

pub async fn list_audit_log_handler(
    State(state): State<AppState>,
    Query(query): Query<AuditLogQueryParams>,
) -> ApiResult<Json<Vec<AuditLogEntryResponse>>> {
    let defaults = AuditLogQuery::default();
    let entries = state
        .access_service
        .list_audit_log(AuditLogQuery {
            limit: query.limit.unwrap_or(defaults.limit).min(500),
            offset: query.offset.unwrap_or(defaults.offset),
        })
        .await?
        .into_iter()
        .map(AuditLogEntryResponse::from)
        .collect();

    Ok(Json(entries))
}

use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use cadre_application::CampaignListFilter;
use cadre_core::UserIdentity;
use cadre_domain::{CampaignId, CampaignInput, CampaignStatus, CampaignType};

use crate::dto::{
    CampaignDashboardStatsResponse, CampaignRequest, CampaignResponse,
    UpdateCampaignStatusRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

use super::parse_uuid;

#[derive(Debug, Deserialize)]
pub struct CampaignsQuery {
    pub status: Option<String>,
    pub campaign_type: Option<String>,
    pub owner_subject: Option<String>,
}

pub async fn list_campaigns_handler(
    State(state): State<AppState>,
    Query(query): Query<CampaignsQuery>,
) -> ApiResult<Json<Vec<CampaignResponse>>> {
    let filter = CampaignListFilter {
        status: query
            .status
            .as_deref()
            .map(CampaignStatus::from_str)
            .transpose()?,
        campaign_type: query
            .campaign_type
            .as_deref()
            .map(CampaignType::from_str)
            .transpose()?,
        owner_subject: query.owner_subject,
    };

    let campaigns = state
        .campaign_service
        .list(filter)
        .await?
        .into_iter()
        .map(CampaignResponse::from)
        .collect();

    Ok(Json(campaigns))
}

pub async fn create_campaign_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CampaignRequest>,
) -> ApiResult<(StatusCode, Json<CampaignResponse>)> {
    let campaign = state
        .campaign_service
        .create(&user, CampaignInput::try_from(payload)?)
        .await?;

    Ok((StatusCode::CREATED, Json(CampaignResponse::from(campaign))))
}

pub async fn get_campaign_handler(
    State(state): State<AppState>,
    Path(campaign_id): Path<String>,
) -> ApiResult<Json<CampaignResponse>> {
    let campaign_id = CampaignId::from_uuid(parse_uuid(campaign_id.as_str(), "campaign id")?);

    let campaign = state.campaign_service.get(campaign_id).await?;

    Ok(Json(CampaignResponse::from(campaign)))
}

pub async fn update_campaign_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(campaign_id): Path<String>,
    Json(payload): Json<CampaignRequest>,
) -> ApiResult<Json<CampaignResponse>> {
    let campaign_id = CampaignId::from_uuid(parse_uuid(campaign_id.as_str(), "campaign id")?);

    let campaign = state
        .campaign_service
        .update(&user, campaign_id, CampaignInput::try_from(payload)?)
        .await?;

    Ok(Json(CampaignResponse::from(campaign)))
}

pub async fn delete_campaign_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(campaign_id): Path<String>,
) -> ApiResult<StatusCode> {
    let campaign_id = CampaignId::from_uuid(parse_uuid(campaign_id.as_str(), "campaign id")?);

    state.campaign_service.delete(&user, campaign_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_campaign_status_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(campaign_id): Path<String>,
    Json(payload): Json<UpdateCampaignStatusRequest>,
) -> ApiResult<Json<CampaignResponse>> {
    let campaign_id = CampaignId::from_uuid(parse_uuid(campaign_id.as_str(), "campaign id")?);
    let next = CampaignStatus::from_str(payload.status.as_str())?;

    let campaign = state
        .campaign_service
        .change_status(&user, campaign_id, next)
        .await?;

    Ok(Json(CampaignResponse::from(campaign)))
}

pub async fn dashboard_stats_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<CampaignDashboardStatsResponse>> {
    let stats = state.campaign_service.dashboard_stats().await?;

    Ok(Json(CampaignDashboardStatsResponse::from(stats)))
}

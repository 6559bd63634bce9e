use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;

use cadre_application::SlackIntegrationInput;
use cadre_core::{AppError, UserIdentity};

use crate::dto::{
    GenericMessageResponse, SaveSlackIntegrationRequest, SlackIntegrationResponse,
    UserPreferencesPayload,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn get_preferences_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<UserPreferencesPayload>> {
    let preferences = state.preference_service.preferences(&user).await?;

    Ok(Json(UserPreferencesPayload::from(preferences)))
}

pub async fn update_preferences_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<UserPreferencesPayload>,
) -> ApiResult<Json<UserPreferencesPayload>> {
    let preferences = state
        .preference_service
        .update_preferences(&user, payload.into())
        .await?;

    Ok(Json(UserPreferencesPayload::from(preferences)))
}

pub async fn get_slack_integration_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<SlackIntegrationResponse>> {
    let integration = state
        .preference_service
        .slack_integration(&user)
        .await?
        .ok_or_else(|| AppError::NotFound("no slack integration is configured".to_owned()))?;

    Ok(Json(SlackIntegrationResponse::from(integration)))
}

pub async fn save_slack_integration_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<SaveSlackIntegrationRequest>,
) -> ApiResult<Json<SlackIntegrationResponse>> {
    let integration = state
        .preference_service
        .set_slack_integration(
            &user,
            SlackIntegrationInput {
                webhook_url: payload.webhook_url,
                channel_name: payload.channel_name,
                is_active: payload.is_active,
            },
        )
        .await?;

    Ok(Json(SlackIntegrationResponse::from(integration)))
}

pub async fn delete_slack_integration_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<StatusCode> {
    state.preference_service.remove_slack_integration(&user).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn test_slack_integration_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<GenericMessageResponse>> {
    state.preference_service.send_test_notification(&user).await?;

    Ok(Json(GenericMessageResponse {
        message: "test notification delivered".to_owned(),
    }))
}

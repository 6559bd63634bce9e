use axum::Json;
use axum::extract::State;

use cadre_core::AppError;

use crate::dto::HealthResponse;
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn health_live_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn health_ready_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<HealthResponse>> {
    sqlx::query("SELECT 1")
        .execute(&state.pool)
        .await
        .map_err(|error| AppError::Internal(format!("database is not reachable: {error}")))?;

    Ok(Json(HealthResponse { status: "ready" }))
}

//! Session-based authentication handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use cadre_application::{AuthOutcome, RegisterParams};
use cadre_core::{AppError, UserIdentity};
use tower_sessions::Session;

use crate::dto::{
    AuthLoginRequest, AuthRegisterRequest, GenericMessageResponse, UserIdentityResponse,
    VerifyEmailRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// Session key holding the authenticated [`UserIdentity`].
pub const SESSION_USER_KEY: &str = "authenticated_user";

/// POST /auth/register - create an account with email and password.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<AuthRegisterRequest>,
) -> ApiResult<(StatusCode, Json<GenericMessageResponse>)> {
    state
        .user_service
        .register(RegisterParams {
            email: payload.email,
            password: payload.password,
            display_name: payload.display_name,
        })
        .await?;

    // Generic response; the token travels by mail only.
    Ok((
        StatusCode::CREATED,
        Json(GenericMessageResponse {
            message: "a link to activate your account has been emailed to the address provided"
                .to_owned(),
        }),
    ))
}

/// POST /auth/verify-email - consume a mailed verification token.
pub async fn verify_email_handler(
    State(state): State<AppState>,
    Json(payload): Json<VerifyEmailRequest>,
) -> ApiResult<Json<GenericMessageResponse>> {
    state.user_service.verify_email(payload.token.as_str()).await?;

    Ok(Json(GenericMessageResponse {
        message: "email address verified; you can sign in now".to_owned(),
    }))
}

/// POST /auth/login - authenticate with email and password.
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<AuthLoginRequest>,
) -> ApiResult<Json<UserIdentityResponse>> {
    let outcome = state
        .user_service
        .login(payload.email.as_str(), payload.password.as_str())
        .await?;

    let user = match outcome {
        AuthOutcome::Authenticated(user) => user,
        AuthOutcome::EmailUnverified => {
            return Err(AppError::Unauthorized(
                "verify your email address before signing in".to_owned(),
            )
            .into());
        }
        AuthOutcome::Failed => {
            return Err(
                AppError::Unauthorized("invalid email or password".to_owned()).into(),
            );
        }
    };

    let identity = UserIdentity::new(
        user.id.to_string(),
        user.display_name.clone(),
        Some(user.email.clone()),
    );

    session
        .insert(SESSION_USER_KEY, identity.clone())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    Ok(Json(UserIdentityResponse::from(identity)))
}

/// POST /auth/logout - drop the session.
pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me - return the authenticated account.
pub async fn me_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<Json<UserIdentityResponse>> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let user = state.user_service.profile(identity.subject()).await?;

    Ok(Json(UserIdentityResponse::from(user)))
}

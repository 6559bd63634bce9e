use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use cadre_core::AppError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route(
            "/api/access/organizations",
            get(handlers::access::list_organizations_handler),
        )
        .route("/api/access/teams", get(handlers::access::list_teams_handler))
        .route("/api/access/roles", get(handlers::access::list_roles_handler))
        .route(
            "/api/access/permissions",
            get(handlers::access::list_permissions_handler),
        )
        .route(
            "/api/access/role-permissions",
            get(handlers::access::list_role_permissions_handler),
        )
        .route(
            "/api/access/roles/{role_id}/permissions",
            axum::routing::put(handlers::access::save_role_permissions_handler),
        )
        .route(
            "/api/access/roles/{role_id}/copy-permissions",
            post(handlers::access::copy_role_permissions_handler),
        )
        .route(
            "/api/access/audit-log",
            get(handlers::access::list_audit_log_handler),
        )
        .route(
            "/api/approvers/modules",
            get(handlers::approvers::list_modules_handler),
        )
        .route(
            "/api/approvers/users",
            get(handlers::approvers::list_approver_users_handler),
        )
        .route(
            "/api/approvers/modules/{module_id}/approvers",
            get(handlers::approvers::module_approvers_handler)
                .put(handlers::approvers::replace_module_approvers_handler),
        )
        .route(
            "/api/campaigns",
            get(handlers::campaigns::list_campaigns_handler)
                .post(handlers::campaigns::create_campaign_handler),
        )
        .route(
            "/api/campaigns/dashboard-stats",
            get(handlers::campaigns::dashboard_stats_handler),
        )
        .route(
            "/api/campaigns/{campaign_id}",
            get(handlers::campaigns::get_campaign_handler)
                .put(handlers::campaigns::update_campaign_handler)
                .delete(handlers::campaigns::delete_campaign_handler),
        )
        .route(
            "/api/campaigns/{campaign_id}/status",
            post(handlers::campaigns::update_campaign_status_handler),
        )
        .route(
            "/api/me/preferences",
            get(handlers::preferences::get_preferences_handler)
                .put(handlers::preferences::update_preferences_handler),
        )
        .route(
            "/api/me/preferences/slack",
            get(handlers::preferences::get_slack_integration_handler)
                .put(handlers::preferences::save_slack_integration_handler)
                .delete(handlers::preferences::delete_slack_integration_handler),
        )
        .route(
            "/api/me/preferences/slack/test",
            post(handlers::preferences::test_slack_integration_handler),
        )
        .route("/auth/me", get(auth::me_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route_layer(from_fn(middleware::require_auth));

    let public_routes = Router::new()
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/verify-email", post(auth::verify_email_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/health/live", get(handlers::health::health_live_handler))
        .route("/health/ready", get(handlers::health::health_ready_handler));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    Ok(Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(session_layer)
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}

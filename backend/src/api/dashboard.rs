//! Role-gated dashboard endpoints.
//!
//! `/client/*` is reachable only with a client session and `/freelancer/*`
//! only with a freelancer session. Both sit behind `jwt_auth`.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::auth::AuthState;
use crate::auth::middleware::{jwt_auth, require_role};
use crate::auth::models::UserInfo;
use crate::database::models::Role;
use crate::services::user_service::UserService;
use crate::utils::jwt::Claims;
use axum::{
    Extension, Router,
    http::StatusCode,
    middleware,
    response::Json,
    routing::get,
};
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub user_info: UserInfo,
    pub dashboard_path: String,
}

/// Path of the dashboard the given user lands on after login.
pub fn dashboard_path(role: Role, user_id: &str) -> String {
    format!("/dashboard/{}/{}", role, user_id)
}

#[axum::debug_handler]
pub async fn overview(
    Extension(pool): Extension<SqlitePool>,
    Extension(auth): Extension<AuthState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<DashboardOverview>>, (StatusCode, String)> {
    let user_service = UserService::new(&pool, &auth.passwords);
    let user = user_service
        .get_user_required(claims.user_id())
        .await
        .map_err(service_error_to_http)?;

    Ok(Json(ApiResponse::ok(DashboardOverview {
        dashboard_path: dashboard_path(user.role, &user.id),
        user_info: UserInfo::from(&user),
    })))
}

fn role_router(role: Role) -> Router {
    // Layers run outermost-last, so jwt_auth populates claims before the role check.
    Router::new()
        .route("/me", get(overview))
        .route_layer(middleware::from_fn_with_state(role, require_role))
        .route_layer(middleware::from_fn(jwt_auth))
}

pub fn client_router() -> Router {
    role_router(Role::Client)
}

pub fn freelancer_router() -> Router {
    role_router(Role::Freelancer)
}

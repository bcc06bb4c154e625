//! Central module for organizing the application's API endpoints.
//!
//! Assembles the `/user` authentication routes and the role-gated dashboard
//! routes into one router with the shared layers attached.

pub mod common;
pub mod dashboard;

use crate::api::common::ApiResponse;
use crate::auth::AuthState;
use crate::auth::routes::user_router;
use axum::{
    Extension, Router,
    http::{HeaderValue, Method, header},
    response::Json,
    routing::get,
};
use sqlx::SqlitePool;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Builds the full application router.
///
/// `cors_origin` restricts cross-origin access to a single web origin. When
/// absent, any origin is accepted.
pub fn create_router(pool: SqlitePool, auth: AuthState, cors_origin: Option<&str>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .nest("/user", user_router())
        .nest("/client", dashboard::client_router())
        .nest("/freelancer", dashboard::freelancer_router())
        .layer(Extension(pool))
        .layer(Extension(auth))
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match origin.and_then(|origin| HeaderValue::from_str(origin).ok()) {
        // Only echoed back to requests whose Origin matches.
        Some(origin) => layer.allow_origin(AllowOrigin::list([origin])),
        None => layer.allow_origin(Any),
    }
}

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::success(
        serde_json::json!({
            "service": "FreelanceHub Backend",
            "version": env!("CARGO_PKG_VERSION"),
        }),
        "Welcome to FreelanceHub API",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::utils::jwt::JwtUtils;
    use crate::utils::password::PasswordHasher;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_root_banner() {
        let auth = AuthState::new(
            JwtUtils::new("test-secret", 60),
            PasswordHasher::new(4).unwrap(),
        );
        let app = create_router(test_pool().await, auth, Some("http://localhost:3000"));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            None
        );
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let auth = AuthState::new(
            JwtUtils::new("test-secret", 60),
            PasswordHasher::new(4).unwrap(),
        );
        let app = create_router(test_pool().await, auth, Some("http://localhost:3000"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "http://localhost:3000"
        );
    }

    #[tokio::test]
    async fn test_cors_ignores_other_origins() {
        let auth = AuthState::new(
            JwtUtils::new("test-secret", 60),
            PasswordHasher::new(4).unwrap(),
        );
        let app = create_router(test_pool().await, auth, Some("http://localhost:3000"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "http://evil.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            None
        );
    }
}

//! Handler functions for authentication-related API endpoints.
//!
//! These functions process incoming HTTP requests for login, registration,
//! token verification and the current-user lookup, and delegate to
//! `auth::service` and `services::user_service` for the business logic.

use crate::api::common::{ApiResponse, service_error_to_http, validation_error_response};
use crate::auth::AuthState;
use crate::auth::extract::{BodyRejection, JsonOrForm};
use crate::auth::middleware::bearer_token;
use crate::auth::models::*;
use crate::auth::service::AuthService;
use crate::database::models::CreateNewUser;
use crate::repositories::user_repository::UserRepository;
use crate::services::user_service::UserService;
use crate::utils::jwt::Claims;
use axum::{
    extract::{Extension, Json},
    http::{HeaderMap, StatusCode},
    response::Json as ResponseJson,
};
use sqlx::SqlitePool;
use validator::Validate;

/// Handle user login request
#[axum::debug_handler]
pub async fn login(
    Extension(pool): Extension<SqlitePool>,
    Extension(auth): Extension<AuthState>,
    payload: Result<JsonOrForm<LoginRequest>, BodyRejection>,
) -> (StatusCode, ResponseJson<LoginResponse>) {
    let payload = match payload {
        Ok(JsonOrForm(payload)) => payload,
        Err(rejection) => {
            tracing::debug!(
                status = %rejection.status,
                reason = %rejection.message,
                "Unreadable login body"
            );
            return (
                StatusCode::BAD_REQUEST,
                ResponseJson(LoginResponse::failure(
                    StatusCode::BAD_REQUEST.as_u16(),
                    "Username and password are required",
                )),
            );
        }
    };

    let auth_service = AuthService::new(
        UserRepository::new(&pool),
        &auth.jwt_utils,
        &auth.passwords,
    );

    match auth_service.authenticate(&payload).await {
        Ok(success) => (StatusCode::OK, ResponseJson(LoginResponse::success(success))),
        Err(error) => {
            let status = error.status_code();
            (
                status,
                ResponseJson(LoginResponse::failure(status.as_u16(), error.public_message())),
            )
        }
    }
}

/// Resolve the bearer token to an identity.
///
/// Always answers with a `TokenVerification` body; the status is 401 when the
/// token is missing or does not verify.
#[axum::debug_handler]
pub async fn verify(
    Extension(pool): Extension<SqlitePool>,
    Extension(auth): Extension<AuthState>,
    headers: HeaderMap,
) -> (StatusCode, ResponseJson<TokenVerification>) {
    let Some(token) = bearer_token(&headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            ResponseJson(TokenVerification::invalid()),
        );
    };

    let auth_service = AuthService::new(
        UserRepository::new(&pool),
        &auth.jwt_utils,
        &auth.passwords,
    );
    let verification = auth_service.verify_token(token);
    let status = if verification.valid {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };

    (status, ResponseJson(verification))
}

/// Handle user registration request
#[axum::debug_handler]
pub async fn register(
    Extension(pool): Extension<SqlitePool>,
    Extension(auth): Extension<AuthState>,
    Json(payload): Json<CreateNewUser>,
) -> Result<(StatusCode, ResponseJson<ApiResponse<UserInfo>>), (StatusCode, String)> {
    if let Err(validation_errors) = payload.validate() {
        return Err(validation_error_response(&validation_errors));
    }

    let user_service = UserService::new(&pool, &auth.passwords);

    match user_service.register(payload).await {
        Ok(user) => Ok((
            StatusCode::CREATED,
            ResponseJson(ApiResponse::success(
                UserInfo::from(&user),
                "User registered successfully",
            )),
        )),
        Err(error) => Err(service_error_to_http(error)),
    }
}

/// Handle logout request (client-side token invalidation)
#[axum::debug_handler]
pub async fn logout() -> ResponseJson<ApiResponse<serde_json::Value>> {
    // Session tokens are stateless; the client discards its copy.
    ResponseJson(ApiResponse::success(
        serde_json::json!({}),
        "Logged out successfully",
    ))
}

/// Get current user information from token
#[axum::debug_handler]
pub async fn me(
    Extension(pool): Extension<SqlitePool>,
    Extension(auth): Extension<AuthState>,
    Extension(claims): Extension<Claims>,
) -> Result<ResponseJson<ApiResponse<UserInfo>>, (StatusCode, String)> {
    let user_service = UserService::new(&pool, &auth.passwords);

    match user_service.get_user_required(claims.user_id()).await {
        Ok(user) => Ok(ResponseJson(ApiResponse::success(
            UserInfo::from(&user),
            "User retrieved successfully",
        ))),
        Err(error) => Err(service_error_to_http(error)),
    }
}

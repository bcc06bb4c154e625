//! Data structures for authentication-related entities.
//!
//! This module defines the login request and response payloads, the sanitized
//! user info returned to clients, and the token verification result.

use crate::database::models::{Role, User};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Login request payload
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// User information returned to clients. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    /// Avatar reference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
            profile_id: user.profile_id.clone(),
            image: user.image.clone(),
        }
    }
}

/// Result of a successful credential check
#[derive(Debug)]
pub struct LoginSuccess {
    pub token: String,
    pub user_info: UserInfo,
}

/// Wire shape of `POST /user/login`.
///
/// `status` mirrors the HTTP status code so that clients reading only the
/// body can branch on it.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub status: u16,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfo>,
}

impl LoginResponse {
    pub fn success(success: LoginSuccess) -> Self {
        Self {
            status: 200,
            msg: "Logged in successfully".to_string(),
            token: Some(success.token),
            user_info: Some(success.user_info),
        }
    }

    pub fn failure(status: u16, msg: impl Into<String>) -> Self {
        Self {
            status,
            msg: msg.into(),
            token: None,
            user_info: None,
        }
    }
}

/// Outcome of resolving a session token back to an identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TokenVerification {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl TokenVerification {
    pub fn invalid() -> Self {
        Self {
            valid: false,
            user_id: None,
            role: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_info_wire_format() {
        let info = UserInfo {
            id: "u1".to_string(),
            username: "alice_99".to_string(),
            role: Role::Client,
            profile_id: Some("p1".to_string()),
            image: None,
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(
            value,
            json!({"_id": "u1", "username": "alice_99", "role": "client", "profileId": "p1"})
        );
    }

    #[test]
    fn test_failure_response_omits_token() {
        let value = serde_json::to_value(LoginResponse::failure(401, "nope")).unwrap();
        assert_eq!(value, json!({"status": 401, "msg": "nope"}));
    }

    #[test]
    fn test_login_request_debug_redacts_password() {
        let request = LoginRequest {
            username: "alice_99".to_string(),
            password: "correctpass1".to_string(),
        };
        assert!(!format!("{:?}", request).contains("correctpass1"));
    }
}

//! # API Client
//!
//! HTTP client for communicating with the FreelanceHub backend.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::error::{ApiError, ApiResult};
use super::types::{LoginRequest, LoginResponse, VerifyResponse};
use super::AuthApi;

/// HTTP client for the `/user` endpoints.
///
/// The client is cheaply cloneable and can be shared across tasks.
///
/// # Examples
///
/// ```rust,ignore
/// use freelancehub_client::api::HttpAuthClient;
///
/// let client = HttpAuthClient::new("http://localhost:3001", Duration::from_secs(30))?;
/// let verification = client.verify(&token).await?;
/// ```
#[derive(Clone)]
pub struct HttpAuthClient {
    base_url: String,
    http: Client,
}

impl HttpAuthClient {
    /// Creates a new client for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl AuthApi for HttpAuthClient {
    /// Posts credentials to `/user/login`.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Network`] - Network request failed
    /// * [`ApiError::Server`] - Non-login body on an error status
    /// * [`ApiError::InvalidResponse`] - Success status with an unreadable body
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let res = self
            .http
            .post(format!("{}/user/login", self.base_url))
            .json(request)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        match serde_json::from_str::<LoginResponse>(&body) {
            Ok(response) => Ok(response),
            Err(e) if status.is_success() => Err(ApiError::InvalidResponse(e.to_string())),
            Err(_) => Err(ApiError::Server {
                status: status.as_u16(),
                message: body,
            }),
        }
    }

    /// Resolves `token` through `/user/verify`.
    ///
    /// Both 200 and 401 carry a verification body.
    async fn verify(&self, token: &str) -> ApiResult<VerifyResponse> {
        let res = self
            .http
            .get(format!("{}/user/verify", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        let status = res.status();
        if status != StatusCode::OK && status != StatusCode::UNAUTHORIZED {
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: res.text().await.unwrap_or_default(),
            });
        }

        res.json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Role;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> HttpAuthClient {
        HttpAuthClient::new(format!("{}/", server.uri()), Duration::from_secs(5)).unwrap()
    }

    fn credentials() -> LoginRequest {
        LoginRequest {
            username: "alice_99".to_string(),
            password: "correctpass1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/login"))
            .and(body_json(json!({"username": "alice_99", "password": "correctpass1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": 200,
                "msg": "Logged in successfully",
                "token": "signed.token.value",
                "userInfo": {"_id": "u1", "username": "alice_99", "role": "client"}
            })))
            .mount(&server)
            .await;

        let response = client(&server).login(&credentials()).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.token.as_deref(), Some("signed.token.value"));
        assert_eq!(response.user_info.unwrap().role, Role::Client);
    }

    #[tokio::test]
    async fn test_login_rejection_is_a_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "status": 401,
                "msg": "Invalid username or password"
            })))
            .mount(&server)
            .await;

        let response = client(&server).login(&credentials()).await.unwrap();
        assert_eq!(response.status, 401);
        assert_eq!(response.msg, "Invalid username or password");
        assert!(response.token.is_none());
    }

    #[tokio::test]
    async fn test_login_gateway_error_is_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/login"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = client(&server).login(&credentials()).await.unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_verify_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/user/verify"))
            .and(header("Authorization", "Bearer good-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "valid": true,
                "userId": "u1",
                "role": "freelancer"
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/user/verify"))
            .and(header("Authorization", "Bearer stale-token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"valid": false})))
            .mount(&server)
            .await;

        let api = client(&server);
        let valid = api.verify("good-token").await.unwrap();
        assert!(valid.valid);
        assert_eq!(valid.role, Some(Role::Freelancer));

        let invalid = api.verify("stale-token").await.unwrap();
        assert!(!invalid.valid);
        assert_eq!(invalid.user_id, None);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let api = HttpAuthClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let err = api.verify("token").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}

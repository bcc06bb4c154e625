//! # API Module
//!
//! HTTP access to the FreelanceHub `/user` endpoints.

mod client;
mod error;
mod types;

pub use client::HttpAuthClient;
pub use error::{ApiError, ApiResult};
pub use types::{LoginRequest, LoginResponse, Role, UserInfo, VerifyResponse};

use async_trait::async_trait;

/// Remote authentication operations used by the login flow and bootstrap.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Submits credentials. Any response carrying a login body is `Ok`, even
    /// when its `status` reports a failure.
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse>;

    /// Resolves a session token. An expired or forged token is `Ok` with
    /// `valid == false`.
    async fn verify(&self, token: &str) -> ApiResult<VerifyResponse>;
}

//! Custom error types specific to authentication failures.
//!
//! Unknown usernames, wrong passwords and disabled accounts all collapse into
//! [`AuthError::InvalidCredentials`]; store failures are kept apart as
//! [`AuthError::ServiceUnavailable`].

use crate::errors::ServiceError;
use axum::http::StatusCode;
use thiserror::Error;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable, please try again later";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Credential store unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "validation_error",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::ServiceUnavailable(_) => "service_unavailable",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Message safe to hand to the caller.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::Validation(message) => message.clone(),
            AuthError::InvalidCredentials => INVALID_CREDENTIALS_MESSAGE.to_string(),
            AuthError::ServiceUnavailable(_) => SERVICE_UNAVAILABLE_MESSAGE.to_string(),
            AuthError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl From<ServiceError> for AuthError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Validation { message } => AuthError::Validation(message),
            ServiceError::Database { source } => AuthError::ServiceUnavailable(source.to_string()),
            other => AuthError::Internal(other.to_string()),
        }
    }
}

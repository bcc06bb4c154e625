//! Failure taxonomy of the login flow and bootstrap.

use thiserror::Error;

use super::form::FieldErrors;
use crate::api::ApiError;

/// Shown when the backend could not be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Unable to reach the server. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    /// Local field validation failed; nothing was sent.
    #[error("validation failed")]
    Validation(FieldErrors),

    /// The backend rejected the credentials.
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Stored session token is expired, malformed or forged.
    #[error("session token is invalid")]
    TokenInvalid,

    /// Login succeeded but the session could not be written to storage.
    #[error("could not save session: {0}")]
    Storage(String),
}

impl LoginError {
    /// Stable code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            LoginError::Validation(_) => "validation_error",
            LoginError::Authentication(_) => "invalid_credentials",
            LoginError::ServiceUnavailable(_) => "service_unavailable",
            LoginError::TokenInvalid => "token_invalid",
            LoginError::Storage(_) => "storage_error",
        }
    }

    /// Text for the single user-visible notification.
    pub fn user_message(&self) -> String {
        match self {
            LoginError::Validation(_) => "Please correct the highlighted fields".to_string(),
            LoginError::Authentication(message) | LoginError::ServiceUnavailable(message) => {
                message.clone()
            }
            LoginError::TokenInvalid => "Your session has expired. Please log in again.".to_string(),
            LoginError::Storage(_) => "Could not save your session. Please try again.".to_string(),
        }
    }
}

impl From<ApiError> for LoginError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Network(_) => LoginError::ServiceUnavailable(NETWORK_ERROR_MESSAGE.to_string()),
            ApiError::Server { status, .. } if status < 500 => {
                LoginError::Authentication(format!("Request rejected ({status})"))
            }
            ApiError::Server { .. } | ApiError::InvalidResponse(_) => {
                LoginError::ServiceUnavailable(NETWORK_ERROR_MESSAGE.to_string())
            }
        }
    }
}

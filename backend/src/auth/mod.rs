//! Authentication module for user login, session tokens, and access control.
//!
//! This module provides the public interface for authentication-related functionality
//! such as login, registration, token verification, and authorization middleware.

pub mod errors;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;

use crate::config::Config;
use crate::errors::ServiceResult;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::PasswordHasher;
use std::sync::Arc;

/// Signing keys and password hasher shared by every request.
#[derive(Clone)]
pub struct AuthState {
    pub jwt_utils: Arc<JwtUtils>,
    pub passwords: Arc<PasswordHasher>,
}

impl AuthState {
    pub fn new(jwt_utils: JwtUtils, passwords: PasswordHasher) -> Self {
        Self {
            jwt_utils: Arc::new(jwt_utils),
            passwords: Arc::new(passwords),
        }
    }

    pub fn from_config(config: &Config) -> ServiceResult<Self> {
        Ok(Self::new(
            JwtUtils::from_config(config),
            PasswordHasher::new(config.bcrypt_cost)?,
        ))
    }
}

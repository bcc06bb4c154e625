//! Core business logic for the authentication system.

use crate::auth::errors::AuthError;
use crate::auth::models::*;
use crate::errors::format_validation_errors;
use crate::repositories::CredentialStore;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::PasswordHasher;
use validator::Validate;

/// Authentication service for credential checks and session token handling
pub struct AuthService<'a, S: CredentialStore> {
    store: S,
    jwt_utils: &'a JwtUtils,
    passwords: &'a PasswordHasher,
}

impl<'a, S: CredentialStore> AuthService<'a, S> {
    /// Create a new AuthService instance
    pub fn new(store: S, jwt_utils: &'a JwtUtils, passwords: &'a PasswordHasher) -> Self {
        AuthService {
            store,
            jwt_utils,
            passwords,
        }
    }

    /// Authenticate a user and issue a session token.
    ///
    /// Unknown usernames, disabled accounts and wrong passwords all yield
    /// [`AuthError::InvalidCredentials`]. A failing store yields
    /// [`AuthError::ServiceUnavailable`].
    pub async fn authenticate(&self, login_request: &LoginRequest) -> Result<LoginSuccess, AuthError> {
        if let Err(validation_errors) = login_request.validate() {
            return Err(AuthError::Validation(format_validation_errors(&validation_errors)));
        }

        let user = self
            .store
            .find_by_username(&login_request.username)
            .await
            .map_err(|e| {
                tracing::error!("Credential lookup failed: {:#}", e);
                AuthError::ServiceUnavailable(e.to_string())
            })?;

        let candidate = user.filter(|user| user.is_active);
        let matched = self
            .passwords
            .verify_password(
                &login_request.password,
                candidate.as_ref().map(|user| user.password_hash.as_str()),
            )
            .await?;

        let user = match candidate {
            Some(user) if matched => user,
            _ => {
                let error = AuthError::InvalidCredentials;
                tracing::warn!(
                    username = %login_request.username,
                    code = error.code(),
                    "Login rejected"
                );
                return Err(error);
            }
        };

        let token = self.jwt_utils.issue_token(&user.id, user.role)?;

        tracing::info!(user_id = %user.id, role = %user.role, "User logged in");

        Ok(LoginSuccess {
            token,
            user_info: UserInfo::from(&user),
        })
    }

    /// Resolve a session token back to an identity. Never fails: anything
    /// that does not verify is reported as `valid: false`.
    pub fn verify_token(&self, token: &str) -> TokenVerification {
        match self.jwt_utils.validate_token(token) {
            Ok(claims) => TokenVerification {
                valid: true,
                user_id: Some(claims.sub),
                role: Some(claims.role),
            },
            Err(e) => {
                tracing::debug!("Token rejected: {}", e);
                TokenVerification::invalid()
            }
        }
    }
}

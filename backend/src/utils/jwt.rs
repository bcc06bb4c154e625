//! JWT token utilities for authentication and authorization.
//!
//! Provides session token creation, validation, and claims access. Tokens are
//! HS256-signed and carry the user id and marketplace role.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::database::models::Role;
use crate::errors::ServiceError;

/// JWT Claims structure identifying the authenticated user
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Marketplace role
    pub role: Role,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

/// JWT token utility for creating and validating tokens
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in: Duration,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from a signing secret and token lifetime.
    pub fn new(secret: &str, expires_in_seconds: u64) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Expiry is exact, no clock-skew allowance.
        validation.leeway = 0;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            expires_in: Duration::seconds(expires_in_seconds as i64),
        }
    }

    /// Create a new JwtUtils instance from application configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.jwt_secret, config.jwt_expires_in_seconds)
    }

    /// Generate a new session token for the given user, issued now.
    pub fn issue_token(&self, user_id: &str, role: Role) -> Result<String, ServiceError> {
        self.issue_token_at(user_id, role, Utc::now())
    }

    /// Generate a session token as if it had been issued at `issued_at`.
    pub fn issue_token_at(
        &self,
        user_id: &str,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<String, ServiceError> {
        let exp = issued_at + self.expires_in;

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            exp: exp.timestamp().max(0) as usize,
            iat: issued_at.timestamp().max(0) as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| ServiceError::unauthorized(format!("Token validation failed: {}", e)))
    }
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Check if user has specific role
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

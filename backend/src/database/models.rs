//! Rust structs that represent database table mappings.
//!
//! These models define the structure of data as it is stored in and retrieved
//! from the database. Note that these differ from the API-facing models in
//! `auth::models`, which never carry the password hash.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

/// Marketplace role of a user. Drives the post-login dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Freelancer,
}

#[derive(Debug, Error)]
#[error("Invalid role: {0}")]
pub struct ParseRoleError(pub String);

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Freelancer => "freelancer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "client" => Ok(Role::Client),
            "freelancer" => Ok(Role::Freelancer),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = ParseRoleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Stored user credential record.
#[derive(Clone, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub profile_id: Option<String>,
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Hand-written so the hash never ends up in log output.
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("profile_id", &self.profile_id)
            .field("image", &self.image)
            .field("is_active", &self.is_active)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Registration payload as received from the API.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewUser {
    #[validate(
        length(min = 1, max = 64, message = "Username must be between 1-64 characters"),
        custom(function = "validate_username_charset")
    )]
    pub username: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    pub role: Role,

    pub profile_id: Option<String>,

    pub image: Option<String>,
}

/// Row to insert once the password has been hashed.
#[derive(Clone)]
pub struct CreateUser {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub profile_id: Option<String>,
    pub image: Option<String>,
}

fn validate_username_charset(username: &str) -> Result<(), validator::ValidationError> {
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(validator::ValidationError::new("username_charset").with_message(
            "Username must only contain letters, numbers, and underscores".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("client".parse::<Role>().unwrap(), Role::Client);
        assert_eq!("Freelancer".parse::<Role>().unwrap(), Role::Freelancer);
        assert!("admin".parse::<Role>().is_err());
        assert_eq!(Role::Client.to_string(), "client");
    }

    #[test]
    fn test_create_new_user_validation() {
        let valid = CreateNewUser {
            username: "alice_99".to_string(),
            password: "correctpass1".to_string(),
            role: Role::Client,
            profile_id: None,
            image: None,
        };
        assert!(valid.validate().is_ok());

        let bad_charset = CreateNewUser {
            username: "alice-99".to_string(),
            ..valid.clone()
        };
        let errors = bad_charset.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));

        let short_password = CreateNewUser {
            password: "short".to_string(),
            ..valid
        };
        let errors = short_password.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_user_debug_redacts_hash() {
        let user = User {
            id: "u1".to_string(),
            username: "alice_99".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            role: Role::Client,
            profile_id: None,
            image: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let rendered = format!("{:?}", user);
        assert!(!rendered.contains("$2b$04$secret"));
        assert!(rendered.contains("<redacted>"));
    }
}

//! User business logic service.
//!
//! Handles registration and user lookups.

use crate::database::models::{CreateNewUser, CreateUser, User};
use crate::errors::{ServiceError, ServiceResult, format_validation_errors};
use crate::repositories::CredentialStore;
use crate::repositories::user_repository::UserRepository;
use crate::utils::password::PasswordHasher;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

pub struct UserService<'a> {
    /// Shared database connection pool
    pool: &'a SqlitePool,
    passwords: &'a PasswordHasher,
}

impl<'a> UserService<'a> {
    /// Creates a new UserService instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    /// * `passwords` - Hasher used for new credentials
    pub fn new(pool: &'a SqlitePool, passwords: &'a PasswordHasher) -> Self {
        Self { pool, passwords }
    }

    /// Registers a new user with full validation.
    ///
    /// # Errors
    /// Returns `ServiceError` for:
    /// - Validation failures
    /// - Username already taken
    /// - Hashing or storage failures
    pub async fn register(&self, create_user: CreateNewUser) -> ServiceResult<User> {
        if let Err(validation_errors) = create_user.validate() {
            return Err(ServiceError::validation(format_validation_errors(
                &validation_errors,
            )));
        }

        let repo = UserRepository::new(self.pool);

        if repo.username_exists(&create_user.username).await? {
            return Err(ServiceError::already_exists("User", &create_user.username));
        }

        let password_hash = self.passwords.hash_password(&create_user.password).await?;

        let data = CreateUser {
            id: Uuid::now_v7().to_string(),
            username: create_user.username,
            password_hash,
            role: create_user.role,
            profile_id: create_user.profile_id,
            image: create_user.image,
        };

        let username = data.username.clone();
        let user = repo.create_user(data).await.map_err(|e| {
            match e.downcast_ref::<sqlx::Error>() {
                // Lost a race with a concurrent registration.
                Some(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                    ServiceError::already_exists("User", &username)
                }
                _ => ServiceError::from(e),
            }
        })?;
        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(user)
    }

    /// Retrieves an active user by ID for token-authenticated requests.
    ///
    /// # Errors
    /// Returns `ServiceError::NotFound` if user doesn't exist and
    /// `ServiceError::Unauthorized` if the account was deactivated after the
    /// token was issued.
    pub async fn get_user_required(&self, id: &str) -> ServiceResult<User> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", id))?;

        if !user.is_active {
            tracing::warn!(user_id = %id, "Token presented for deactivated account");
            return Err(ServiceError::unauthorized("Account is deactivated"));
        }
        Ok(user)
    }
}

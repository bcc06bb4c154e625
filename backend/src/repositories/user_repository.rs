//! Database repository for user credential operations.
//!
//! Provides the lookups used during login plus the insert used by registration.

use crate::database::models::{CreateUser, User};
use crate::repositories::CredentialStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, username, password_hash, role, profile_id, image, is_active, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    /// Shared SQLite connection pool
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// * `pool` - Reference to SQLite connection pool
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates a new user in the database.
    ///
    /// # Arguments
    /// * `user` - CreateUser row containing the already hashed password
    ///
    /// # Returns
    /// The newly created User with all fields populated
    pub async fn create_user(&self, user: CreateUser) -> Result<User> {
        let now = Utc::now();
        let query = format!(
            r#"
            INSERT INTO users (id, username, password_hash, role, profile_id, image, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)
            RETURNING {USER_COLUMNS}
            "#
        );

        let user = sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(user.username)
            .bind(user.password_hash)
            .bind(user.role.as_str())
            .bind(user.profile_id)
            .bind(user.image)
            .bind(now)
            .bind(now)
            .fetch_one(self.pool)
            .await?;

        Ok(user)
    }

    /// Retrieves a user by their unique identifier.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Retrieves a user by their username.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Checks if a username already exists in the system.
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(self.pool)
            .await?;

        Ok(count > 0)
    }
}

#[async_trait]
impl<'a> CredentialStore for UserRepository<'a> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username(username).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        self.get_user_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Role;
    use crate::database::test_pool;

    fn new_row(id: &str, username: &str, role: Role) -> CreateUser {
        CreateUser {
            id: id.to_string(),
            username: username.to_string(),
            password_hash: "$2b$04$notarealhashbutgoodenoughforstorage".to_string(),
            role,
            profile_id: Some("p1".to_string()),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        let created = repo
            .create_user(new_row("u1", "alice_99", Role::Client))
            .await
            .unwrap();
        assert_eq!(created.id, "u1");
        assert_eq!(created.role, Role::Client);
        assert!(created.is_active);

        let by_name = repo.find_by_username("alice_99").await.unwrap().unwrap();
        assert_eq!(by_name.id, "u1");
        assert_eq!(by_name.profile_id.as_deref(), Some("p1"));

        let by_id = repo.find_by_id("u1").await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice_99");

        assert!(repo.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_username_uniqueness() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        repo.create_user(new_row("u1", "alice_99", Role::Client))
            .await
            .unwrap();
        assert!(repo.username_exists("alice_99").await.unwrap());
        assert!(!repo.username_exists("bob_1").await.unwrap());

        let duplicate = repo
            .create_user(new_row("u2", "alice_99", Role::Freelancer))
            .await;
        assert!(duplicate.is_err());
    }
}

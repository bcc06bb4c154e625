//! Persistence layer.
//!
//! Repositories wrap the SQLite pool and expose typed queries. The auth core
//! only sees the store through [`CredentialStore`].

use crate::database::models::User;
use anyhow::Result;
use async_trait::async_trait;

pub mod user_repository;

/// Read access to stored user credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Looks up an active or inactive user by exact username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Looks up a user by id.
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
}

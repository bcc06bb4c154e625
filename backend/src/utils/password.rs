//! Password hashing and verification.
//!
//! bcrypt work runs on the blocking thread pool. Verification for unknown
//! users is performed against a dummy hash of the same cost so that a missing
//! account and a wrong password take the same time to reject.

use crate::errors::{ServiceError, ServiceResult};
use bcrypt::{hash, verify};

pub struct PasswordHasher {
    cost: u32,
    dummy_hash: String,
}

impl PasswordHasher {
    /// Creates a hasher for the given bcrypt cost.
    ///
    /// # Errors
    /// Returns `ServiceError` if the cost is outside bcrypt's supported range.
    pub fn new(cost: u32) -> ServiceResult<Self> {
        let dummy_hash = hash("not-a-real-password", cost)
            .map_err(|e| ServiceError::internal_error(format!("Invalid bcrypt cost {}: {}", cost, e)))?;
        Ok(Self { cost, dummy_hash })
    }

    /// Hashes a plain text password before storing it.
    pub async fn hash_password(&self, password: &str) -> ServiceResult<String> {
        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || hash(password, cost))
            .await
            .map_err(|e| ServiceError::internal_error(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| ServiceError::internal_error(format!("Password hashing failed: {}", e)))
    }

    /// Verifies a password against the stored hash.
    ///
    /// `None` means there is no stored hash for the account; the dummy hash is
    /// checked instead and the result is always `false`.
    pub async fn verify_password(&self, password: &str, stored_hash: Option<&str>) -> ServiceResult<bool> {
        let known = stored_hash.is_some();
        let password = password.to_string();
        let target = stored_hash.unwrap_or(&self.dummy_hash).to_string();

        let matched = tokio::task::spawn_blocking(move || verify(password, &target))
            .await
            .map_err(|e| {
                ServiceError::internal_error(format!("Password verification task failed: {}", e))
            })?
            // A malformed stored hash is treated as a mismatch.
            .unwrap_or(false);

        Ok(known && matched)
    }
}

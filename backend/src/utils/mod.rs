//! Collection of general utility functions.
//!
//! Token signing and password hashing helpers shared by the auth and user
//! services.

pub mod jwt;
pub mod password;

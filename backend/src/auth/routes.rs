//! Defines the HTTP routes specifically for authentication.
//!
//! These routes handle endpoints like user login, registration, and token
//! verification. They are mounted under `/user` in the main Axum router.

use crate::auth::handlers::*;
use crate::auth::middleware::*;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Creates the authentication router with all auth-related routes
pub fn user_router() -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/verify", get(verify))
        .route("/me", get(me).layer(middleware::from_fn(jwt_auth)))
}

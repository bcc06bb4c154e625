//! # FreelanceHub Client
//!
//! Session client for the FreelanceHub API.
//!
//! ## Modules
//!
//! - [`api`] - HTTP client for the `/user` endpoints
//! - [`auth`] - Login flow controller and session bootstrap
//! - [`session`] - In-memory session and its durable mirror
//! - [`navigation`] - Role-derived routes
//! - [`config`] - Environment configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod navigation;
pub mod session;

#[cfg(test)]
mod test_support;

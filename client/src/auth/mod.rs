//! # Auth Module
//!
//! Login form validation, the login flow controller and session bootstrap.

pub mod bootstrap;
pub mod controller;
mod errors;
pub mod form;
pub mod validation;

pub use bootstrap::{BootstrapOutcome, bootstrap, spawn_bootstrap};
pub use controller::{LoginController, LoginPhase, SubmitOutcome};
pub use errors::{LoginError, NETWORK_ERROR_MESSAGE};
pub use form::{FieldErrors, FieldState, LoginForm};
pub use validation::{Field, validate_field};

//! # Navigation
//!
//! Destinations the client can land on after bootstrap or login.

use std::fmt;

use crate::api::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard { role: Role, user_id: String },
}

impl Route {
    /// Role-derived dashboard for the given user.
    pub fn dashboard(role: Role, user_id: impl Into<String>) -> Self {
        Route::Dashboard {
            role,
            user_id: user_id.into(),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/".to_string(),
            Route::Dashboard { role, user_id } => dashboard_path(*role, user_id),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// `/dashboard/client/{id}` for clients, `/dashboard/freelancer/{id}` otherwise.
pub fn dashboard_path(role: Role, user_id: &str) -> String {
    format!("/dashboard/{}/{}", role, user_id)
}

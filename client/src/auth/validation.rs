//! Field validators for the login form.

use std::fmt;

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    Password,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Username => f.write_str("username"),
            Field::Password => f.write_str("password"),
        }
    }
}

/// Returns the error message for `value`, or `None` when it is acceptable.
pub fn validate_field(field: Field, value: &str) -> Option<String> {
    match field {
        Field::Username => {
            if value.trim().is_empty() {
                Some("Username is required".to_string())
            } else if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                Some("Username must only contain letters, numbers, and underscores".to_string())
            } else {
                None
            }
        }
        Field::Password => {
            if value.is_empty() {
                Some("Password is required".to_string())
            } else if value.chars().count() < MIN_PASSWORD_LENGTH {
                Some(format!(
                    "Password must be at least {} characters",
                    MIN_PASSWORD_LENGTH
                ))
            } else {
                None
            }
        }
    }
}

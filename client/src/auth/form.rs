//! Bound state for the two login fields.

use std::fmt;

use super::validation::{Field, validate_field};
use crate::api::LoginRequest;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub value: String,
    /// Set on first blur or first failed submit.
    pub touched: bool,
    pub error: Option<String>,
}

impl FieldState {
    fn revalidate(&mut self, field: Field) {
        self.error = validate_field(field, &self.value);
    }
}

/// Per-field errors reported by a failed local validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}

#[derive(Clone, Default)]
pub struct LoginForm {
    username: FieldState,
    password: FieldState,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(&self, field: Field) -> &FieldState {
        match field {
            Field::Username => &self.username,
            Field::Password => &self.password,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut FieldState {
        match field {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
        }
    }

    /// Updates a value. Touched fields are re-validated on every change.
    pub fn set_value(&mut self, field: Field, value: impl Into<String>) {
        let state = self.field_mut(field);
        state.value = value.into();
        if state.touched {
            state.revalidate(field);
        }
    }

    pub fn blur(&mut self, field: Field) {
        let state = self.field_mut(field);
        state.touched = true;
        state.revalidate(field);
    }

    /// Validates both fields. On failure both fields become touched.
    pub fn validate_all(&mut self) -> Result<(), FieldErrors> {
        self.username.revalidate(Field::Username);
        self.password.revalidate(Field::Password);

        let errors = self.errors();
        if errors.is_empty() {
            return Ok(());
        }

        self.username.touched = true;
        self.password.touched = true;
        Err(errors)
    }

    pub fn errors(&self) -> FieldErrors {
        FieldErrors {
            username: self.username.error.clone(),
            password: self.password.error.clone(),
        }
    }

    pub fn credentials(&self) -> LoginRequest {
        LoginRequest {
            username: self.username.value.clone(),
            password: self.password.value.clone(),
        }
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password_touched", &self.password.touched)
            .field("password_error", &self.password.error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_field_is_not_validated_on_change() {
        let mut form = LoginForm::new();
        form.set_value(Field::Username, "bad name");
        assert_eq!(form.field(Field::Username).error, None);
        assert!(!form.field(Field::Username).touched);
    }

    #[test]
    fn test_blur_touches_and_validates() {
        let mut form = LoginForm::new();
        form.set_value(Field::Password, "short");
        form.blur(Field::Password);

        let state = form.field(Field::Password);
        assert!(state.touched);
        assert_eq!(
            state.error.as_deref(),
            Some("Password must be at least 8 characters")
        );

        form.set_value(Field::Password, "longenough");
        assert_eq!(form.field(Field::Password).error, None);
    }

    #[test]
    fn test_failed_validate_all_touches_every_field() {
        let mut form = LoginForm::new();
        form.set_value(Field::Password, "correctpass1");

        let errors = form.validate_all().unwrap_err();
        assert_eq!(errors.username.as_deref(), Some("Username is required"));
        assert_eq!(errors.password, None);
        assert!(form.field(Field::Username).touched);
        assert!(form.field(Field::Password).touched);

        form.set_value(Field::Username, "alice_99");
        assert_eq!(form.field(Field::Username).error, None);
        assert!(form.validate_all().is_ok());
    }

    #[test]
    fn test_debug_hides_password_value() {
        let mut form = LoginForm::new();
        form.set_value(Field::Password, "correctpass1");
        assert!(!format!("{:?}", form).contains("correctpass1"));
    }
}

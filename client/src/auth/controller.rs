//! Login flow controller.
//!
//! Drives one login attempt at a time through
//! `Idle -> Validating -> Submitting -> Success | Failure`.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::errors::{LoginError, NETWORK_ERROR_MESSAGE};
use super::form::{FieldErrors, LoginForm};
use super::validation::Field;
use crate::api::{ApiResult, AuthApi, LoginResponse};
use crate::config::DEFAULT_REVEAL_DELAY;
use crate::navigation::Route;
use crate::session::{ClientSession, KeyValueStore, SessionContext, persist_session};

const REJECTED_MESSAGE: &str = "Invalid username or password";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginPhase {
    Idle,
    Validating,
    Submitting,
    Success,
    Failure(LoginError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another attempt was already in flight.
    Ignored,
    /// Local validation failed; no request was made.
    Invalid(FieldErrors),
    Success { redirect: Route, message: String },
    Failed(LoginError),
}

pub struct LoginController {
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn KeyValueStore>,
    session: SessionContext,
    form: Mutex<LoginForm>,
    phase: Mutex<LoginPhase>,
    in_flight: AtomicBool,
    reveal_delay: Duration,
}

impl LoginController {
    pub fn new(
        api: Arc<dyn AuthApi>,
        storage: Arc<dyn KeyValueStore>,
        session: SessionContext,
    ) -> Self {
        Self {
            api,
            storage,
            session,
            form: Mutex::new(LoginForm::new()),
            phase: Mutex::new(LoginPhase::Idle),
            in_flight: AtomicBool::new(false),
            reveal_delay: DEFAULT_REVEAL_DELAY,
        }
    }

    /// Minimum time the busy state lasts after a response arrives.
    pub fn with_reveal_delay(mut self, reveal_delay: Duration) -> Self {
        self.reveal_delay = reveal_delay;
        self
    }

    pub fn set_value(&self, field: Field, value: impl Into<String>) {
        self.form.lock().set_value(field, value);
    }

    pub fn blur(&self, field: Field) {
        self.form.lock().blur(field);
    }

    pub fn form(&self) -> LoginForm {
        self.form.lock().clone()
    }

    pub fn phase(&self) -> LoginPhase {
        self.phase.lock().clone()
    }

    /// True while an attempt is validating or waiting on the server.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Runs one login attempt.
    ///
    /// A call made while another is in flight returns
    /// [`SubmitOutcome::Ignored`]. Dropping the returned future cancels the
    /// attempt and returns the controller to [`LoginPhase::Idle`].
    pub async fn submit(&self) -> SubmitOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, &self.phase) else {
            tracing::debug!("Login already in flight, ignoring submit");
            return SubmitOutcome::Ignored;
        };

        self.set_phase(LoginPhase::Validating);
        let request = {
            let mut form = self.form.lock();
            match form.validate_all() {
                Ok(()) => form.credentials(),
                Err(errors) => {
                    self.set_phase(LoginPhase::Failure(LoginError::Validation(errors.clone())));
                    return SubmitOutcome::Invalid(errors);
                }
            }
        };

        self.set_phase(LoginPhase::Submitting);
        tracing::debug!(username = %request.username, "Submitting login");
        let result = self.api.login(&request).await;

        if !self.reveal_delay.is_zero() {
            tokio::time::sleep(self.reveal_delay).await;
        }

        match self.complete(result) {
            Ok((redirect, message)) => {
                self.set_phase(LoginPhase::Success);
                SubmitOutcome::Success { redirect, message }
            }
            Err(error) => {
                tracing::warn!(code = error.code(), "Login failed");
                self.set_phase(LoginPhase::Failure(error.clone()));
                SubmitOutcome::Failed(error)
            }
        }
    }

    fn complete(&self, result: ApiResult<LoginResponse>) -> Result<(Route, String), LoginError> {
        let response = result.map_err(LoginError::from)?;

        match response.status {
            200 => {}
            status if status >= 500 => {
                return Err(LoginError::ServiceUnavailable(non_empty_or(
                    response.msg,
                    NETWORK_ERROR_MESSAGE,
                )));
            }
            _ => {
                return Err(LoginError::Authentication(non_empty_or(
                    response.msg,
                    REJECTED_MESSAGE,
                )));
            }
        }

        let (Some(token), Some(user_info)) = (response.token, response.user_info) else {
            tracing::error!("Login succeeded without a token or userInfo");
            return Err(LoginError::ServiceUnavailable(NETWORK_ERROR_MESSAGE.to_string()));
        };

        persist_session(self.storage.as_ref(), &token, &user_info)
            .map_err(|e| LoginError::Storage(e.to_string()))?;

        let session = ClientSession::new(token, &user_info);
        let redirect = session.home();
        self.session.populate(session);

        tracing::info!(user_id = %user_info.id, role = %user_info.role, "Logged in");
        Ok((redirect, response.msg))
    }

    fn set_phase(&self, phase: LoginPhase) {
        *self.phase.lock() = phase;
    }
}

fn non_empty_or(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

/// Holds the single in-flight slot for the length of an attempt.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
    phase: &'a Mutex<LoginPhase>,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool, phase: &'a Mutex<LoginPhase>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self { flag, phase })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        {
            let mut phase = self.phase.lock();
            if matches!(*phase, LoginPhase::Validating | LoginPhase::Submitting) {
                *phase = LoginPhase::Idle;
            }
        }
        self.flag.store(false, Ordering::Release);
    }
}

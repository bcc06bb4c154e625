//! Session bootstrap.
//!
//! Restores a previous session from durable storage at startup so that a
//! returning user skips the login form.

use std::sync::Arc;
use tokio::task::JoinHandle;

use super::errors::LoginError;
use crate::api::AuthApi;
use crate::navigation::Route;
use crate::session::{
    ClientSession, KeyValueStore, SessionContext, WeakSession, clear_persisted_session,
    load_persisted_session,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// A live session exists; go straight to its dashboard.
    Resume { redirect: Route },
    ShowLogin,
}

/// Resolves the startup route.
///
/// An existing in-memory session wins without any I/O, so repeated calls
/// after a successful restore are free. A stored token the backend rejects is
/// cleared. When the backend cannot be reached the stored copy is kept for
/// the next start and the login form is shown.
pub async fn bootstrap(
    api: &dyn AuthApi,
    storage: &dyn KeyValueStore,
    session: &SessionContext,
) -> BootstrapOutcome {
    resume(api, storage, &session.downgrade())
        .await
        .unwrap_or(BootstrapOutcome::ShowLogin)
}

/// Runs [`bootstrap`] on a background task that does not keep `session` alive.
///
/// Resolves to `None`, with nothing written, if every [`SessionContext`]
/// handle was dropped before the check finished.
pub fn spawn_bootstrap(
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn KeyValueStore>,
    session: &SessionContext,
) -> JoinHandle<Option<BootstrapOutcome>> {
    let session = session.downgrade();
    tokio::spawn(async move { resume(api.as_ref(), storage.as_ref(), &session).await })
}

async fn resume(
    api: &dyn AuthApi,
    storage: &dyn KeyValueStore,
    session: &WeakSession,
) -> Option<BootstrapOutcome> {
    if let Some(current) = session.upgrade()?.current() {
        return Some(BootstrapOutcome::Resume {
            redirect: current.home(),
        });
    }

    let persisted = match load_persisted_session(storage) {
        Ok(Some(persisted)) => persisted,
        Ok(None) => return Some(BootstrapOutcome::ShowLogin),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read stored session");
            return Some(BootstrapOutcome::ShowLogin);
        }
    };

    let verification = api.verify(&persisted.token).await;

    let Some(session) = session.upgrade() else {
        tracing::debug!("Client torn down during bootstrap, abandoning");
        return None;
    };

    match verification {
        Ok(verification)
            if verification.valid
                && verification
                    .user_id
                    .as_deref()
                    .is_none_or(|id| id == persisted.user_info.id) =>
        {
            let mut user_info = persisted.user_info;
            if let Some(role) = verification.role {
                user_info.role = role;
            }

            let restored = ClientSession::new(persisted.token, &user_info);
            let redirect = restored.home();
            session.populate(restored);

            tracing::info!(user_id = %user_info.id, "Restored stored session");
            Some(BootstrapOutcome::Resume { redirect })
        }
        Ok(_) => {
            let error = LoginError::TokenInvalid;
            tracing::info!(code = error.code(), "Stored session rejected, clearing it");
            if let Err(e) = clear_persisted_session(storage) {
                tracing::warn!(error = %e, "Could not clear stored session");
            }
            Some(BootstrapOutcome::ShowLogin)
        }
        Err(e) => {
            let error = LoginError::from(e);
            tracing::warn!(code = error.code(), "Could not verify stored session");
            Some(BootstrapOutcome::ShowLogin)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Role;
    use crate::auth::controller::{LoginController, SubmitOutcome};
    use crate::auth::validation::Field;
    use crate::session::storage::TOKEN_KEY;
    use crate::session::{MemoryStorage, PersistedSession, persist_session};
    use crate::test_support::{FakeAuthApi, alice};
    use std::time::Duration;
    use tokio::sync::Notify;

    fn stored(token: &str) -> Arc<MemoryStorage> {
        let storage = Arc::new(MemoryStorage::new());
        persist_session(storage.as_ref(), token, &alice()).unwrap();
        storage
    }

    #[tokio::test]
    async fn test_valid_stored_token_resumes_dashboard() {
        let api = FakeAuthApi::with_alice().accept_token("live-token", "u1", Role::Client);
        let storage = stored("live-token");
        let session = SessionContext::new();

        let outcome = bootstrap(&api, storage.as_ref(), &session).await;

        assert_eq!(
            outcome,
            BootstrapOutcome::Resume {
                redirect: Route::dashboard(Role::Client, "u1")
            }
        );
        let current = session.current().unwrap();
        assert_eq!(current.token, "live-token");
        assert_eq!(current.avatar.as_deref(), Some("alice.png"));
        assert_eq!(api.verifications(), 1);
    }

    #[tokio::test]
    async fn test_expired_stored_token_is_cleared() {
        let api = FakeAuthApi::with_alice();
        let storage = stored("expired-token");
        let session = SessionContext::new();

        let outcome = bootstrap(&api, storage.as_ref(), &session).await;

        assert_eq!(outcome, BootstrapOutcome::ShowLogin);
        assert!(!session.is_authenticated());
        assert_eq!(load_persisted_session(storage.as_ref()).unwrap(), None);
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_token_for_another_user_is_cleared() {
        let api = FakeAuthApi::with_alice().accept_token("their-token", "u2", Role::Client);
        let storage = stored("their-token");
        let session = SessionContext::new();

        assert_eq!(
            bootstrap(&api, storage.as_ref(), &session).await,
            BootstrapOutcome::ShowLogin
        );
        assert_eq!(load_persisted_session(storage.as_ref()).unwrap(), None);
    }

    #[tokio::test]
    async fn test_nothing_stored_shows_login_without_network() {
        let api = FakeAuthApi::with_alice();
        let storage = MemoryStorage::new();
        let session = SessionContext::new();

        assert_eq!(
            bootstrap(&api, &storage, &session).await,
            BootstrapOutcome::ShowLogin
        );
        assert_eq!(api.verifications(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_backend_keeps_stored_session() {
        let api = FakeAuthApi::with_alice().accept_token("live-token", "u1", Role::Client);
        api.set_available(false);
        let storage = stored("live-token");
        let session = SessionContext::new();

        assert_eq!(
            bootstrap(&api, storage.as_ref(), &session).await,
            BootstrapOutcome::ShowLogin
        );
        assert!(!session.is_authenticated());
        assert_eq!(
            load_persisted_session(storage.as_ref()).unwrap(),
            Some(PersistedSession {
                token: "live-token".to_string(),
                user_info: alice(),
            })
        );
    }

    #[tokio::test]
    async fn test_repeated_bootstrap_is_idempotent() {
        let api = FakeAuthApi::with_alice().accept_token("live-token", "u1", Role::Client);
        let storage = stored("live-token");
        let session = SessionContext::new();

        let first = bootstrap(&api, storage.as_ref(), &session).await;
        let second = bootstrap(&api, storage.as_ref(), &session).await;

        assert_eq!(first, second);
        assert_eq!(api.verifications(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_survives_restart() {
        let api = Arc::new(FakeAuthApi::with_alice());
        let storage = Arc::new(MemoryStorage::new());

        let controller = LoginController::new(api.clone(), storage.clone(), SessionContext::new())
            .with_reveal_delay(Duration::ZERO);
        controller.set_value(Field::Username, "alice_99");
        controller.set_value(Field::Password, "correctpass1");
        assert!(matches!(
            controller.submit().await,
            SubmitOutcome::Success { .. }
        ));
        drop(controller);

        let restarted = SessionContext::new();
        let outcome = bootstrap(api.as_ref(), storage.as_ref(), &restarted).await;
        assert_eq!(
            outcome,
            BootstrapOutcome::Resume {
                redirect: Route::dashboard(Role::Client, "u1")
            }
        );
    }

    #[tokio::test]
    async fn test_spawned_bootstrap_resolves() {
        let api = Arc::new(FakeAuthApi::with_alice().accept_token("live-token", "u1", Role::Client));
        let storage = stored("live-token");
        let session = SessionContext::new();

        let outcome = spawn_bootstrap(api, storage, &session).await.unwrap();

        assert!(matches!(outcome, Some(BootstrapOutcome::Resume { .. })));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_spawned_bootstrap_is_abandoned_after_teardown() {
        let gate = Arc::new(Notify::new());
        let api = Arc::new(FakeAuthApi::with_alice().gated(gate.clone()));
        let storage = stored("expired-token");
        let session = SessionContext::new();

        let handle = spawn_bootstrap(api.clone(), storage.clone(), &session);
        // Let the task reach the verification call before tearing down.
        tokio::task::yield_now().await;
        assert_eq!(api.verifications(), 1);
        drop(session);
        gate.notify_one();

        assert_eq!(handle.await.unwrap(), None);
        // The rejected token would normally be cleared; a torn-down client writes nothing.
        assert!(storage.get(TOKEN_KEY).unwrap().is_some());
    }
}

//! # Session State
//!
//! The single in-memory session slot of a running client.

use parking_lot::RwLock;
use std::fmt;
use std::sync::{Arc, Weak};

use crate::api::{Role, UserInfo};
use crate::navigation::Route;

/// Authenticated identity held by the client.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSession {
    pub token: String,
    pub user_id: String,
    pub role: Role,
    /// Avatar reference taken from `userInfo.image`.
    pub avatar: Option<String>,
}

impl ClientSession {
    pub fn new(token: impl Into<String>, user_info: &UserInfo) -> Self {
        Self {
            token: token.into(),
            user_id: user_info.id.clone(),
            role: user_info.role,
            avatar: user_info.image.clone(),
        }
    }

    /// Role-derived dashboard for this session.
    pub fn home(&self) -> Route {
        Route::dashboard(self.role, self.user_id.clone())
    }
}

impl fmt::Debug for ClientSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSession")
            .field("token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("role", &self.role)
            .field("avatar", &self.avatar)
            .finish()
    }
}

/// Shared handle to the session slot.
///
/// Create one per client instance and pass clones to whatever needs it.
/// Every update replaces the whole session under one write lock.
#[derive(Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<ClientSession>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn populate(&self, session: ClientSession) {
        *self.inner.write() = Some(session);
    }

    /// Empties the slot, returning what was there.
    pub fn clear(&self) -> Option<ClientSession> {
        self.inner.write().take()
    }

    pub fn current(&self) -> Option<ClientSession> {
        self.inner.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.read().as_ref().map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_some()
    }

    /// A handle that does not keep the slot alive.
    pub fn downgrade(&self) -> WeakSession {
        WeakSession {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Non-owning [`SessionContext`] handle for work that may outlive the client.
#[derive(Clone)]
pub struct WeakSession {
    inner: Weak<RwLock<Option<ClientSession>>>,
}

impl WeakSession {
    /// Returns `None` once every [`SessionContext`] clone has been dropped.
    pub fn upgrade(&self) -> Option<SessionContext> {
        self.inner.upgrade().map(|inner| SessionContext { inner })
    }
}

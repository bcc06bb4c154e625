//! # Session Module
//!
//! In-memory session state and its durable mirror.

mod state;
pub mod storage;

pub use state::{ClientSession, SessionContext, WeakSession};
pub use storage::{
    FileStorage, KeyValueStore, MemoryStorage, PersistedSession, StorageError, StorageResult,
    clear_persisted_session, load_persisted_session, persist_session,
};

/// Ends the session: empties the slot and removes the durable copy.
pub fn logout<S: KeyValueStore + ?Sized>(
    session: &SessionContext,
    storage: &S,
) -> StorageResult<()> {
    if let Some(previous) = session.clear() {
        tracing::info!(user_id = %previous.user_id, "Logged out");
    }
    clear_persisted_session(storage)
}

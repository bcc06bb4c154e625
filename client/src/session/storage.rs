//! # Durable Session Storage
//!
//! A small string key-value store that survives restarts, and the helpers
//! that mirror a session into it under the `token` and `userInfo` keys.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::UserInfo;

/// Key holding the raw session token.
pub const TOKEN_KEY: &str = "token";
/// Key holding the serialized [`UserInfo`].
pub const USER_INFO_KEY: &str = "userInfo";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// String key-value storage that outlives the process.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// JSON object on disk, rewritten on every change.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> StorageResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        match serde_json::from_str(&contents) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Session file is corrupt, starting empty");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let _guard = self.lock.lock();
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let _guard = self.lock.lock();
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

/// Process-local storage, for embedding and tests.
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// Session as mirrored in durable storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSession {
    pub token: String,
    pub user_info: UserInfo,
}

/// Writes `userInfo` then `token`, so a readable token always has its user.
pub fn persist_session<S: KeyValueStore + ?Sized>(
    storage: &S,
    token: &str,
    user_info: &UserInfo,
) -> StorageResult<()> {
    let user_info = serde_json::to_string(user_info)?;
    storage.set(USER_INFO_KEY, &user_info)?;
    storage.set(TOKEN_KEY, token)
}

/// Reads the persisted session.
///
/// A half-written or unreadable pair is cleared and reported as absent.
pub fn load_persisted_session<S: KeyValueStore + ?Sized>(
    storage: &S,
) -> StorageResult<Option<PersistedSession>> {
    let token = storage.get(TOKEN_KEY)?.filter(|t| !t.is_empty());
    let user_info = storage.get(USER_INFO_KEY)?;

    let (token, user_info) = match (token, user_info) {
        (None, None) => return Ok(None),
        (Some(token), Some(user_info)) => (token, user_info),
        _ => {
            tracing::warn!("Incomplete persisted session, clearing it");
            clear_persisted_session(storage)?;
            return Ok(None);
        }
    };

    match serde_json::from_str::<UserInfo>(&user_info) {
        Ok(user_info) => Ok(Some(PersistedSession { token, user_info })),
        Err(e) => {
            tracing::warn!(error = %e, "Persisted userInfo is unreadable, clearing session");
            clear_persisted_session(storage)?;
            Ok(None)
        }
    }
}

pub fn clear_persisted_session<S: KeyValueStore + ?Sized>(storage: &S) -> StorageResult<()> {
    storage.remove(TOKEN_KEY)?;
    storage.remove(USER_INFO_KEY)
}

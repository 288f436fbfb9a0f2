//! Key-value persistence
//!
//! Settings and the leaderboard are stored as JSON strings under fixed keys.
//! - `MemoryStore` for native runs and tests
//! - `LocalStorageStore` on the web

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

use std::collections::HashMap;
use std::fmt;

/// Storage failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backing storage could not be reached (e.g. LocalStorage disabled)
    Unavailable,
    /// The backend refused the write (quota, private mode, ...)
    Write { key: String },
    Serialize(String),
    Deserialize(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "storage unavailable"),
            Self::Write { key } => write!(f, "failed to write key {key:?}"),
            Self::Serialize(msg) => write!(f, "serialize failed: {msg}"),
            Self::Deserialize(msg) => write!(f, "deserialize failed: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// A string key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

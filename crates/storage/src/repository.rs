use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Fixed keys the quiz writes under.
pub mod keys {
    /// JSON array of leaderboard entries.
    pub const LEADERBOARD: &str = "quiz_leaderboard";
    /// JSON `{ "username": ... }` record for the last player.
    pub const USER_PROFILE: &str = "quiz_user_profile";
}

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// String-keyed key-value store holding serialized quiz state.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl LocalStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Holds the active store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub store: Arc<dyn LocalStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_set_get_remove() {
        let store = InMemoryStore::new();
        assert_eq!(store.get(keys::LEADERBOARD).await.unwrap(), None);

        store.set(keys::LEADERBOARD, "[]").await.unwrap();
        store.set(keys::LEADERBOARD, "[1]").await.unwrap();
        assert_eq!(
            store.get(keys::LEADERBOARD).await.unwrap().as_deref(),
            Some("[1]")
        );

        store.remove(keys::LEADERBOARD).await.unwrap();
        store.remove(keys::LEADERBOARD).await.unwrap();
        assert_eq!(store.get(keys::LEADERBOARD).await.unwrap(), None);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let storage = Storage::in_memory();
        let other = storage.clone();
        storage.store.set(keys::USER_PROFILE, "x").await.unwrap();
        assert!(other.store.get(keys::USER_PROFILE).await.unwrap().is_some());
    }
}

use std::sync::Arc;

use quiz_core::model::Username;
use storage::records::{decode_profile, encode_profile};
use storage::repository::{LocalStore, keys};

use crate::error::ProfileError;

/// Remembers the last player name so the next visit can greet them.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn LocalStore>,
}

impl ProfileService {
    #[must_use]
    pub fn new(store: Arc<dyn LocalStore>) -> Self {
        Self { store }
    }

    /// Load the remembered player, if any.
    ///
    /// Unreadable or corrupt profiles are logged and treated as absent.
    pub async fn load(&self) -> Option<Username> {
        let raw = match self.store.get(keys::USER_PROFILE).await {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read profile");
                return None;
            }
        };
        match decode_profile(&raw) {
            Ok(username) => username,
            Err(err) => {
                tracing::warn!(error = %err, "discarding corrupt profile");
                None
            }
        }
    }

    /// Validate and remember a player name.
    ///
    /// A failed write is logged; the validated name is still returned.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::Username` if `raw` is blank.
    pub async fn save(&self, raw: &str) -> Result<Username, ProfileError> {
        let username = Username::parse(raw)?;
        self.remember(&username).await;
        Ok(username)
    }

    /// Persist an already validated name. Returns false if the write failed.
    pub async fn remember(&self, username: &Username) -> bool {
        let result = match encode_profile(username) {
            Ok(value) => self.store.set(keys::USER_PROFILE, &value).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(error = %err, "failed to save profile");
                false
            }
        }
    }

    /// Forget the remembered player.
    pub async fn clear(&self) {
        if let Err(err) = self.store.remove(keys::USER_PROFILE).await {
            tracing::warn!(error = %err, "failed to clear profile");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryStore;

    fn service() -> (InMemoryStore, ProfileService) {
        let store = InMemoryStore::new();
        let svc = ProfileService::new(Arc::new(store.clone()));
        (store, svc)
    }

    #[tokio::test]
    async fn remembers_trimmed_name() {
        let (_, svc) = service();
        assert_eq!(svc.load().await, None);

        let saved = svc.save("  Ada ").await.unwrap();

        assert_eq!(saved.as_str(), "Ada");
        assert_eq!(svc.load().await, Some(saved));
    }

    #[tokio::test]
    async fn blank_name_is_rejected_and_not_stored() {
        let (store, svc) = service();
        let err = svc.save("   ").await.unwrap_err();
        assert!(matches!(err, ProfileError::Username(_)));
        assert_eq!(store.get(keys::USER_PROFILE).await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_profile_reads_as_absent() {
        let (store, svc) = service();
        store.set(keys::USER_PROFILE, "not json").await.unwrap();
        assert_eq!(svc.load().await, None);
    }

    #[tokio::test]
    async fn clear_forgets_player() {
        let (_, svc) = service();
        svc.save("Ada").await.unwrap();
        svc.clear().await;
        assert_eq!(svc.load().await, None);
    }
}

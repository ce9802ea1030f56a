//! In-process credential store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{CredentialKey, CredentialStore, StoreError, StoredValue};

/// A [`CredentialStore`] backed by a shared `HashMap`.
///
/// Cloning is cheap and every clone sees the same entries, so a test can
/// hand one clone to the controller and keep another to inspect what was
/// written. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<CredentialKey, StoredValue>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`, e.g. a remembered
    /// token from a "previous run".
    pub fn with_entries(
        entries: impl IntoIterator<Item = (CredentialKey, StoredValue)>,
    ) -> Self {
        Self {
            entries: Arc::new(Mutex::new(entries.into_iter().collect())),
        }
    }

    /// Returns the number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Returns `true` if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl CredentialStore for MemoryStore {
    async fn get(
        &self,
        key: CredentialKey,
    ) -> Result<Option<StoredValue>, StoreError> {
        Ok(self.entries.lock().await.get(&key).cloned())
    }

    async fn set(
        &self,
        key: CredentialKey,
        value: StoredValue,
    ) -> Result<(), StoreError> {
        self.entries.lock().await.insert(key, value);
        tracing::trace!(%key, "memory store set");
        Ok(())
    }

    async fn remove(&self, key: CredentialKey) -> Result<(), StoreError> {
        self.entries.lock().await.remove(&key);
        tracing::trace!(%key, "memory store remove");
        Ok(())
    }
}

//! The [`CredentialStore`] trait.

use std::future::Future;

use crate::{CredentialKey, StoredValue, StoreError};

/// Durable key→value persistence for the login controller.
///
/// # Trait bounds
///
/// - `Send + Sync + 'static` → the store is moved into the controller's
///   Tokio task and lives as long as it does.
///
/// # Contract
///
/// - Each operation is individually durable once its future completes.
/// - `set` overwrites and `remove` on a missing key succeeds, so every
///   write the controller issues is safe to repeat.
///
/// # Example
///
/// ```rust
/// use latchkey_store::{CredentialKey, CredentialStore, MemoryStore};
///
/// # async fn demo() -> Result<(), latchkey_store::StoreError> {
/// let store = MemoryStore::new();
/// store.set(CredentialKey::RememberedToken, "tok".into()).await?;
///
/// let value = store.get(CredentialKey::RememberedToken).await?;
/// assert_eq!(value.as_ref().and_then(|v| v.as_text()), Some("tok"));
/// # Ok(())
/// # }
/// ```
pub trait CredentialStore: Send + Sync + 'static {
    /// Reads the value stored under `key`, or `None` if absent.
    fn get(
        &self,
        key: CredentialKey,
    ) -> impl Future<Output = Result<Option<StoredValue>, StoreError>> + Send;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(
        &self,
        key: CredentialKey,
        value: StoredValue,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(
        &self,
        key: CredentialKey,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

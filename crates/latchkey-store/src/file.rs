//! File-backed credential store.
//!
//! The whole store is one small JSON object:
//!
//! ```json
//! { "remembered_token": "9f86d081…", "lockout_expires_at": 1700000060000 }
//! ```
//!
//! Writes go to a sibling temp file first and are then renamed over the
//! real one. A rename within a directory is atomic on every platform we
//! care about, so a crash mid-write leaves either the old document or the
//! new one, never a truncated mix.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::{CredentialKey, CredentialStore, StoreError, StoredValue};

type Document = BTreeMap<String, StoredValue>;

/// A [`CredentialStore`] persisted as a JSON file.
///
/// A missing file reads as an empty store; it's created on first write,
/// along with any missing parent directories. A file that can't be decoded
/// fails reads with [`StoreError::Decode`] and is replaced by the next
/// `set` or `remove`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store backed by `path`. No I/O happens until the first
    /// operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    async fn load(&self) -> Result<Document, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Document::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(StoreError::Decode),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Loads the document for a read-modify-write. An undecodable file is
    /// treated as empty so the write replaces it; the flag reports that.
    async fn load_for_write(&self) -> Result<(Document, bool), StoreError> {
        match self.load().await {
            Ok(doc) => Ok((doc, false)),
            Err(StoreError::Decode(e)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "credential file is corrupt, replacing it"
                );
                Ok((Document::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    /// Sibling path for the write-then-rename, e.g. `creds.json.tmp`.
    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    async fn save(&self, doc: &Document) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.io_error(e))?;
            }
        }

        let bytes = serde_json::to_vec_pretty(doc).map_err(StoreError::Encode)?;
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }
}

impl CredentialStore for FileStore {
    async fn get(
        &self,
        key: CredentialKey,
    ) -> Result<Option<StoredValue>, StoreError> {
        let mut doc = self.load().await?;
        Ok(doc.remove(key.as_str()))
    }

    async fn set(
        &self,
        key: CredentialKey,
        value: StoredValue,
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let (mut doc, _) = self.load_for_write().await?;
        doc.insert(key.as_str().to_owned(), value);
        self.save(&doc).await?;
        tracing::debug!(%key, path = %self.path.display(), "credential stored");
        Ok(())
    }

    async fn remove(&self, key: CredentialKey) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let (mut doc, recovered) = self.load_for_write().await?;
        if doc.remove(key.as_str()).is_none() && !recovered {
            return Ok(());
        }
        self.save(&doc).await?;
        tracing::debug!(%key, path = %self.path.display(), "credential removed");
        Ok(())
    }
}

//! Error types for the store layer.

use std::path::PathBuf;

/// Errors that can occur while reading or writing credentials.
///
/// The login controller never surfaces these to the user. It logs them
/// and keeps its in-memory state, so every variant here is about
/// diagnosing the host storage, not about recovering from it.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The underlying file could not be read, written, or renamed.
    #[error("store I/O failed on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The credential document could not be serialized.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The credential document on disk is not valid JSON (or not the
    /// shape we wrote).
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The backing store is in a state we can't use, e.g. a poisoned
    /// host handle or a value of the wrong type under a known key.
    #[error("store corrupt: {0}")]
    Corrupt(String),
}

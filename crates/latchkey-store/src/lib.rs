//! Credential storage for Latchkey.
//!
//! The login controller persists exactly two things between runs:
//!
//! - the **remembered token**, written when the user opted into
//!   "remember me" and used for auto-login on the next start
//! - the **lockout expiry**, so that restarting the app does not lift a
//!   lockout early
//!
//! Both live behind the [`CredentialStore`] trait. This crate ships two
//! implementations:
//!
//! - [`MemoryStore`]: a shared in-process map (tests, ephemeral hosts)
//! - [`FileStore`]: a JSON document on disk, rewritten atomically
//!
//! # How it fits in the stack
//!
//! ```text
//! Login Controller (above)  ← sole writer of both keys
//!     ↕
//! Store Layer (this crate)  ← get / set / remove per key
//!     ↕
//! Host storage (below)      ← filesystem, keychain, whatever the host provides
//! ```

#![allow(async_fn_in_trait)]

mod error;
mod file;
mod key;
mod memory;
mod store;

pub use error::StoreError;
pub use file::FileStore;
pub use key::{CredentialKey, StoredValue};
pub use memory::MemoryStore;
pub use store::CredentialStore;

//! Credential verification for Latchkey.
//!
//! Latchkey doesn't verify passwords itself; that is the auth backend's
//! job (a REST endpoint, an identity provider, a local user table…).
//! It defines the [`AuthService`] trait instead: one async method that
//! takes a username and password and returns an [`AuthToken`] or an
//! [`AuthError`]. The login controller calls it once per submit and
//! never retries.
//!
//! [`StaticAuthService`] is the in-memory implementation used by the
//! demo and by tests.

#![allow(async_fn_in_trait)]

mod error;
mod service;
mod static_service;

pub use error::AuthError;
pub use service::{AuthService, AuthToken};
pub use static_service::StaticAuthService;

//! # Latchkey
//!
//! Client-side login state controller.
//!
//! Latchkey owns the login screen's state and policy: field validation,
//! a single in-flight attempt at a time, offline gating, a timed lockout
//! after three failures, and "remember me" auto-login. The presentation
//! layer renders [`LoginState`] snapshots and moves on when it receives a
//! [`NavigationEvent`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use latchkey::prelude::*;
//!
//! # async fn demo() -> Result<(), LatchkeyError> {
//! latchkey::init_tracing();
//!
//! let (login, mut navigation) = LoginController::builder(
//!     StaticAuthService::demo(),
//!     FileStore::new("credentials.json"),
//!     ConnectivityMonitor::default(),
//! )
//! .spawn();
//!
//! login.set_username("anne").await?;
//! login.set_password("anne").await?;
//! login.submit().await?;
//!
//! let state = login.settled().await?;
//! println!("error: {:?}", state.error_message());
//! if let Some(event) = navigation.try_next() {
//!     println!("signed in ({:?})", event.reason);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod telemetry;

pub use error::LatchkeyError;
pub use telemetry::{DEFAULT_FILTER, init_tracing};

pub use latchkey_auth as auth;
pub use latchkey_login as login;
pub use latchkey_net as net;
pub use latchkey_store as store;

pub use latchkey_login::{
    LoginConfig, LoginController, LoginHandle, LoginState, NavigationEvent, NavigationReason,
    SubmitOutcome,
};

/// Everything a host needs to wire up a controller.
pub mod prelude {
    pub use crate::LatchkeyError;
    pub use latchkey_auth::{AuthError, AuthService, AuthToken, StaticAuthService};
    pub use latchkey_login::{
        Clock, LoginConfig, LoginController, LoginHandle, LoginState, NavigationEvent,
        NavigationEvents, NavigationReason, SubmitOutcome, SystemClock,
    };
    pub use latchkey_net::{Connectivity, ConnectivityMonitor, ProbeConfig, TcpProbe};
    pub use latchkey_store::{CredentialKey, CredentialStore, FileStore, MemoryStore, StoredValue};
}

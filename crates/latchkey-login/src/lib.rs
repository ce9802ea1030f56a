//! The login state machine for Latchkey.
//!
//! This crate is the core of Latchkey. It owns everything the login
//! screen shows and decides what happens when the user presses submit:
//!
//! 1. **Lockout**: three consecutive failures lock the account for a
//!    configured duration, persisted so a restart doesn't lift it.
//! 2. **Connectivity**: no attempt is made while offline.
//! 3. **Authentication**: one call to the [`AuthService`] per submit,
//!    never more than one in flight.
//! 4. **Remember me**: on success the token is persisted if asked, and
//!    found again on the next start (auto-login).
//! 5. **Navigation**: each success produces exactly one
//!    [`NavigationEvent`].
//!
//! # How it fits in the stack
//!
//! ```text
//! Presentation layer (above)  ← renders LoginState, listens for NavigationEvent
//!     ↕
//! Login layer (this crate)    ← LoginController actor + LoginHandle
//!     ↕
//! Collaborators (below)       ← AuthService, Connectivity, CredentialStore
//! ```
//!
//! [`AuthService`]: latchkey_auth::AuthService

mod clock;
mod config;
mod controller;
mod error;
mod navigation;
mod state;

pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use config::{LOCKOUT_THRESHOLD, LoginConfig};
pub use controller::{LoginController, LoginControllerBuilder, LoginHandle, SubmitOutcome};
pub use error::LoginError;
pub use navigation::{NavigationEvent, NavigationEvents, NavigationReason};
pub use state::{LoginState, messages};

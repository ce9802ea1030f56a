//! Unified error type for Latchkey.

use latchkey_auth::AuthError;
use latchkey_login::LoginError;
use latchkey_net::NetError;
use latchkey_store::StoreError;

/// Top-level error that wraps every crate-specific error.
///
/// Hosts that wire up the whole stack (open a store, start a probe, run
/// the controller) can use `?` throughout and return this one type.
#[derive(Debug, thiserror::Error)]
pub enum LatchkeyError {
    /// A storage error (I/O, encode, decode).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A reachability setup error (bad probe target or timing).
    #[error(transparent)]
    Net(#[from] NetError),

    /// An auth backend error.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The login controller has stopped.
    #[error(transparent)]
    Login(#[from] LoginError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_store_error() {
        let err: LatchkeyError = StoreError::Corrupt("bad".into()).into();
        assert!(matches!(err, LatchkeyError::Store(_)));
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_from_net_error() {
        let err: LatchkeyError = NetError::InvalidTarget("nowhere".into()).into();
        assert!(matches!(err, LatchkeyError::Net(_)));
    }

    #[test]
    fn test_from_auth_error() {
        let err: LatchkeyError = AuthError::Rejected("nope".into()).into();
        assert!(matches!(err, LatchkeyError::Auth(_)));
    }

    #[test]
    fn test_from_login_error() {
        let err: LatchkeyError = LoginError::ControllerClosed.into();
        assert!(matches!(err, LatchkeyError::Login(_)));
        assert_eq!(err.to_string(), "login controller is closed");
    }
}

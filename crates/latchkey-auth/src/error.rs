//! Error types for the auth layer.

/// Why a login attempt failed.
///
/// The controller treats both variants the same way (one more failure
/// towards lockout); the distinction is for logs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The backend looked at the credentials and said no.
    #[error("credentials rejected: {0}")]
    Rejected(String),

    /// The backend couldn't be asked (unreachable, 5xx, timed out).
    #[error("auth service unavailable: {0}")]
    Unavailable(String),
}

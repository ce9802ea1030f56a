//! The [`AuthService`] trait and the token it returns.

use std::future::Future;

use crate::AuthError;

/// An opaque credential issued by the auth backend.
///
/// Latchkey never looks inside it; it only stores it (when the user
/// asked to be remembered) and reports its presence. `Debug` is
/// redacted so tokens don't end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wraps a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the raw token.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthToken(<{} bytes>)", self.0.len())
    }
}

/// Verifies a username/password pair.
///
/// # Trait bounds
///
/// - `Send + Sync` → the controller shares the service with the task
///   that runs each attempt.
/// - `'static` → it lives as long as the controller.
///
/// # Contract
///
/// One call is one attempt. Implementations should not retry on their
/// own and should have no side effects beyond the attempt itself.
///
/// # Example
///
/// ```rust
/// use latchkey_auth::{AuthError, AuthService, AuthToken};
///
/// /// Accepts any user whose password is their name reversed.
/// /// Only for demos, never use this in production!
/// struct ReverseAuth;
///
/// impl AuthService for ReverseAuth {
///     async fn login(
///         &self,
///         username: &str,
///         password: &str,
///     ) -> Result<AuthToken, AuthError> {
///         let expected: String = username.chars().rev().collect();
///         if password == expected {
///             Ok(AuthToken::new(format!("token-for-{username}")))
///         } else {
///             Err(AuthError::Rejected("wrong password".into()))
///         }
///     }
/// }
/// ```
pub trait AuthService: Send + Sync + 'static {
    /// Attempts to log in.
    ///
    /// # Returns
    /// - `Ok(AuthToken)`: credentials accepted
    /// - `Err(AuthError)`: rejected, or the backend couldn't be reached
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthToken, AuthError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_token_debug_is_redacted() {
        let token = AuthToken::new("jwt_token_123");
        let debug = format!("{token:?}");
        assert!(!debug.contains("jwt"));
        assert_eq!(debug, "AuthToken(<13 bytes>)");
    }

    #[test]
    fn test_auth_token_into_inner_returns_raw() {
        assert_eq!(AuthToken::new("abc").into_inner(), "abc");
    }
}

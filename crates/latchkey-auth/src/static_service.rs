//! An in-memory [`AuthService`] with a fixed user table.

use std::collections::HashMap;
use std::time::Duration;

use rand::Rng;

use crate::{AuthError, AuthService, AuthToken};

/// One registered account.
#[derive(Debug, Clone)]
struct Account {
    password: String,
    /// Token to hand out on success. `None` means "mint a fresh one".
    fixed_token: Option<String>,
}

/// Verifies credentials against a table held in memory.
///
/// Useful for demos, local development, and tests. Optionally sleeps
/// before answering to mimic a network round-trip.
///
/// ```rust
/// use latchkey_auth::StaticAuthService;
///
/// let auth = StaticAuthService::new()
///     .with_user("anne", "correct-horse")
///     .with_latency(std::time::Duration::from_millis(300));
/// assert_eq!(auth.user_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticAuthService {
    accounts: HashMap<String, Account>,
    latency: Duration,
}

impl StaticAuthService {
    /// Creates a service with no accounts. Every login fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// The demo account: `anne` / `anne`, always issued `jwt_token_123`.
    pub fn demo() -> Self {
        Self::new().with_fixed_token("anne", "anne", "jwt_token_123")
    }

    /// Registers an account that receives a freshly minted token on each
    /// successful login.
    pub fn with_user(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.accounts.insert(
            username.into(),
            Account {
                password: password.into(),
                fixed_token: None,
            },
        );
        self
    }

    /// Registers an account that always receives `token`.
    pub fn with_fixed_token(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        self.accounts.insert(
            username.into(),
            Account {
                password: password.into(),
                fixed_token: Some(token.into()),
            },
        );
        self
    }

    /// Delays every answer by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Number of registered accounts.
    pub fn user_count(&self) -> usize {
        self.accounts.len()
    }
}

impl AuthService for StaticAuthService {
    async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthToken, AuthError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        // Same error for unknown user and wrong password, so callers
        // can't probe which usernames exist.
        let account = self
            .accounts
            .get(username)
            .filter(|account| account.password == password)
            .ok_or_else(|| AuthError::Rejected("invalid credentials".into()))?;

        tracing::debug!(username, "static auth accepted credentials");

        let token = match &account.fixed_token {
            Some(token) => token.clone(),
            None => generate_token(),
        };
        Ok(AuthToken::new(token))
    }
}

/// Generates a random 32-character hex string (128 bits of entropy).
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 16] = rng.random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_demo_account_returns_fixed_token() {
        let auth = StaticAuthService::demo();

        let token = auth.login("anne", "anne").await.expect("should succeed");

        assert_eq!(token.as_str(), "jwt_token_123");
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_rejected() {
        let auth = StaticAuthService::demo();

        let result = auth.login("anne", "wrong").await;

        assert!(matches!(result, Err(AuthError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_login_unknown_user_matches_wrong_password_error() {
        let auth = StaticAuthService::demo();

        let unknown = auth.login("bob", "anne").await.unwrap_err();
        let wrong = auth.login("anne", "nope").await.unwrap_err();

        assert_eq!(unknown, wrong);
    }

    #[tokio::test]
    async fn test_login_minted_tokens_are_unique_hex() {
        let auth = StaticAuthService::new().with_user("anne", "password1");

        let t1 = auth.login("anne", "password1").await.unwrap();
        let t2 = auth.login("anne", "password1").await.unwrap();

        assert_eq!(t1.as_str().len(), 32);
        assert!(t1.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(t1, t2, "tokens must be unique per login");
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_waits_for_latency() {
        let auth = StaticAuthService::demo().with_latency(Duration::from_millis(300));
        let started = tokio::time::Instant::now();

        auth.login("anne", "anne").await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(300));
    }
}

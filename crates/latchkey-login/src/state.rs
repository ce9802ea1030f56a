//! The login state snapshot.
//!
//! The controller keeps a mutable [`LoginForm`] privately and publishes
//! an immutable [`LoginState`] after every transition. The snapshot
//! computes its derived flags (locked out, login enabled, field errors)
//! once, when it's built, against the clock reading taken at that
//! moment. Readers never see a half-applied transition: they get the old
//! snapshot or the new one.

use std::time::Duration;

use crate::{LoginConfig, Timestamp};

/// User-visible error messages.
pub mod messages {
    /// Shown after the auth service rejects an attempt.
    pub const INVALID_CREDENTIALS: &str = "Invalid Credentials";

    /// Shown when submit is pressed while offline.
    pub const NO_INTERNET: &str = "No internet connection";

    /// Shown when submit is pressed during a lockout.
    pub fn locked_out(minutes: u64) -> String {
        format!("Account locked. Try again in {minutes} minutes.")
    }
}

const MILLIS_PER_MINUTE: u64 = 60_000;

// ---------------------------------------------------------------------------
// LoginForm
// ---------------------------------------------------------------------------

/// The raw, stored fields. Owned and mutated only by the controller task.
#[derive(Clone, Default, PartialEq, Eq)]
pub(crate) struct LoginForm {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) remember_me: bool,
    pub(crate) is_loading: bool,
    pub(crate) failure_count: u32,
    pub(crate) lockout_expires_at: Option<Timestamp>,
    pub(crate) error_message: Option<String>,
}

impl LoginForm {
    /// Time left on the lockout, or `None` if not locked at `now`.
    pub(crate) fn lockout_remaining(&self, now: Timestamp) -> Option<Duration> {
        self.lockout_expires_at
            .filter(|expires| now < *expires)
            .map(|expires| Duration::from_millis(expires - now))
    }
}

/// Whole minutes left, rounded up. A lockout with 1 ms left still reads
/// "1 minutes" rather than "0 minutes".
pub(crate) fn remaining_minutes(remaining: Duration) -> u64 {
    let millis = u64::try_from(remaining.as_millis()).unwrap_or(u64::MAX);
    millis.div_ceil(MILLIS_PER_MINUTE)
}

// ---------------------------------------------------------------------------
// LoginState
// ---------------------------------------------------------------------------

/// An immutable snapshot of the login screen.
///
/// Everything a presentation layer needs to render: field contents,
/// flags, the error line, and per-field validation hints.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginState {
    form: LoginForm,
    observed_at: Timestamp,
    is_locked_out: bool,
    is_login_enabled: bool,
    username_error: Option<String>,
    password_error: Option<String>,
}

impl LoginState {
    pub(crate) fn new(form: LoginForm, config: &LoginConfig, now: Timestamp) -> Self {
        let is_locked_out = form.lockout_remaining(now).is_some();

        let username_len = form.username.chars().count();
        let username_valid =
            username_len >= config.min_username_len && !form.username.contains(' ');
        let password_valid = form.password.chars().count() >= config.min_password_len;

        let username_error = if username_len > 0 && username_len < config.min_username_len {
            Some(format!(
                "Username must be at least {} characters",
                config.min_username_len
            ))
        } else if form.username.contains(' ') {
            Some("Username cannot contain spaces".to_string())
        } else {
            None
        };

        let password_len = form.password.chars().count();
        let password_error = (password_len > 0 && password_len < config.min_password_len)
            .then(|| {
                format!(
                    "Password must be at least {} characters",
                    config.min_password_len
                )
            });

        let is_login_enabled =
            !form.is_loading && !is_locked_out && username_valid && password_valid;

        Self {
            form,
            observed_at: now,
            is_locked_out,
            is_login_enabled,
            username_error,
            password_error,
        }
    }

    pub fn username(&self) -> &str {
        &self.form.username
    }

    pub fn password(&self) -> &str {
        &self.form.password
    }

    pub fn remember_me(&self) -> bool {
        self.form.remember_me
    }

    /// `true` while a login attempt (or the startup credential check) is
    /// in flight.
    pub fn is_loading(&self) -> bool {
        self.form.is_loading
    }

    /// Consecutive failures since the last success or reset.
    pub fn failure_count(&self) -> u32 {
        self.form.failure_count
    }

    /// When the current lockout ends, if one was set. May be in the past
    /// for a snapshot taken after expiry; use [`is_locked_out`](Self::is_locked_out).
    pub fn lockout_expires_at(&self) -> Option<Timestamp> {
        self.form.lockout_expires_at
    }

    pub fn error_message(&self) -> Option<&str> {
        self.form.error_message.as_deref()
    }

    /// Whether a lockout was in force when this snapshot was built.
    pub fn is_locked_out(&self) -> bool {
        self.is_locked_out
    }

    /// Whether the submit button should be enabled.
    pub fn is_login_enabled(&self) -> bool {
        self.is_login_enabled
    }

    /// Validation hint for the username field.
    pub fn username_error(&self) -> Option<&str> {
        self.username_error.as_deref()
    }

    /// Validation hint for the password field.
    pub fn password_error(&self) -> Option<&str> {
        self.password_error.as_deref()
    }

    /// The clock reading the derived flags were computed against.
    pub fn observed_at(&self) -> Timestamp {
        self.observed_at
    }
}

impl std::fmt::Debug for LoginState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginState")
            .field("username", &self.form.username)
            .field("password", &"<redacted>")
            .field("remember_me", &self.form.remember_me)
            .field("is_loading", &self.form.is_loading)
            .field("failure_count", &self.form.failure_count)
            .field("lockout_expires_at", &self.form.lockout_expires_at)
            .field("error_message", &self.form.error_message)
            .field("is_locked_out", &self.is_locked_out)
            .field("is_login_enabled", &self.is_login_enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: Timestamp = 1_700_000_000_000;

    fn state(form: LoginForm) -> LoginState {
        LoginState::new(form, &LoginConfig::default(), NOW)
    }

    fn valid_form() -> LoginForm {
        LoginForm {
            username: "anne".into(),
            password: "password1".into(),
            ..LoginForm::default()
        }
    }

    #[test]
    fn test_default_state_is_empty_and_disabled() {
        let s = state(LoginForm::default());
        assert_eq!(s.username(), "");
        assert_eq!(s.password(), "");
        assert!(!s.remember_me());
        assert_eq!(s.failure_count(), 0);
        assert!(!s.is_locked_out());
        assert!(!s.is_login_enabled());
        assert!(s.username_error().is_none(), "empty field shows no hint");
        assert!(s.password_error().is_none());
    }

    #[test]
    fn test_valid_fields_enable_login() {
        assert!(state(valid_form()).is_login_enabled());
    }

    #[test]
    fn test_loading_disables_login() {
        let s = state(LoginForm {
            is_loading: true,
            ..valid_form()
        });
        assert!(!s.is_login_enabled());
    }

    #[test]
    fn test_future_lockout_locks_and_disables_login() {
        let s = state(LoginForm {
            lockout_expires_at: Some(NOW + 1),
            ..valid_form()
        });
        assert!(s.is_locked_out());
        assert!(!s.is_login_enabled());
    }

    #[test]
    fn test_lockout_at_or_before_now_is_not_locked() {
        for expires in [NOW, NOW - 1] {
            let s = state(LoginForm {
                lockout_expires_at: Some(expires),
                ..valid_form()
            });
            assert!(!s.is_locked_out(), "expires_at={expires}");
            assert!(s.is_login_enabled());
        }
    }

    #[test]
    fn test_short_username_reports_hint() {
        let s = state(LoginForm {
            username: "an".into(),
            ..valid_form()
        });
        assert_eq!(
            s.username_error(),
            Some("Username must be at least 3 characters")
        );
        assert!(!s.is_login_enabled());
    }

    #[test]
    fn test_username_with_space_reports_hint() {
        let s = state(LoginForm {
            username: "anne smith".into(),
            ..valid_form()
        });
        assert_eq!(s.username_error(), Some("Username cannot contain spaces"));
        assert!(!s.is_login_enabled());
    }

    #[test]
    fn test_short_password_reports_hint() {
        let s = state(LoginForm {
            password: "anne".into(),
            ..valid_form()
        });
        assert_eq!(
            s.password_error(),
            Some("Password must be at least 8 characters")
        );
        assert!(!s.is_login_enabled());
    }

    #[test]
    fn test_remaining_minutes_rounds_up() {
        assert_eq!(remaining_minutes(Duration::from_millis(1)), 1);
        assert_eq!(remaining_minutes(Duration::from_secs(60)), 1);
        assert_eq!(remaining_minutes(Duration::from_secs(61)), 2);
        assert_eq!(remaining_minutes(Duration::from_secs(15 * 60)), 15);
    }

    #[test]
    fn test_locked_out_message_format() {
        assert_eq!(
            messages::locked_out(2),
            "Account locked. Try again in 2 minutes."
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", state(valid_form()));
        assert!(!debug.contains("password1"));
        assert!(debug.contains("anne"));
    }
}

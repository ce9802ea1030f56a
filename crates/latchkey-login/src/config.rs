//! Controller configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Consecutive failed attempts that trigger a lockout. Not configurable.
pub const LOCKOUT_THRESHOLD: u32 = 3;

/// Configuration for a [`LoginController`](crate::LoginController).
///
/// `#[serde(default)]` means a config file only has to name the fields
/// it changes; everything else falls back to [`LoginConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    /// How long (in seconds) a lockout lasts once
    /// [`LOCKOUT_THRESHOLD`] failures have been reached.
    ///
    /// Default: 60 seconds. Production deployments are expected to set
    /// their own value.
    pub lockout_secs: u64,

    /// Minimum username length, in characters.
    pub min_username_len: usize,

    /// Minimum password length, in characters.
    pub min_password_len: usize,

    /// How many navigation signals may wait for an observer before new
    /// ones are dropped.
    pub navigation_buffer: usize,

    /// Capacity of the controller's command channel. Callers wait
    /// (backpressure) when it's full.
    pub command_buffer: usize,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            lockout_secs: 60,
            min_username_len: 3,
            min_password_len: 8,
            navigation_buffer: 8,
            command_buffer: 32,
        }
    }
}

impl LoginConfig {
    /// A default config with the given lockout duration, rounded up to
    /// whole seconds.
    pub fn with_lockout(lockout: Duration) -> Self {
        let partial = u64::from(lockout.subsec_nanos() > 0);
        Self {
            lockout_secs: lockout.as_secs().saturating_add(partial),
            ..Self::default()
        }
    }

    /// The lockout duration as a `Duration`.
    pub fn lockout_duration(&self) -> Duration {
        Duration::from_secs(self.lockout_secs)
    }

    /// Fixes values that would make the controller unusable.
    ///
    /// Channel capacities must be at least 1 (Tokio panics on 0), and a
    /// lockout must last at least a second or it would expire the moment
    /// it is set. Called automatically when the controller is spawned.
    pub fn validated(mut self) -> Self {
        if self.lockout_secs == 0 {
            tracing::warn!("lockout_secs is 0, using 1");
            self.lockout_secs = 1;
        }
        if self.navigation_buffer == 0 {
            tracing::warn!("navigation_buffer is 0, using 1");
            self.navigation_buffer = 1;
        }
        if self.command_buffer == 0 {
            tracing::warn!("command_buffer is 0, using 1");
            self.command_buffer = 1;
        }
        self
    }
}

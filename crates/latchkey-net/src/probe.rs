//! Periodic TCP reachability probe.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::{ConnectivityMonitor, NetError};

// ---------------------------------------------------------------------------
// ProbeConfig
// ---------------------------------------------------------------------------

/// Configuration for a [`TcpProbe`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// `host:port` to connect to. Usually the auth service itself.
    pub target: String,

    /// Time between probes, in milliseconds.
    pub interval_ms: u64,

    /// How long a single connect may take before it counts as offline.
    pub timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            target: "1.1.1.1:443".to_string(),
            interval_ms: 5_000,
            timeout_ms: 2_000,
        }
    }
}

impl ProbeConfig {
    /// Checks that the target looks like `host:port` and the timings are
    /// non-zero.
    pub fn validate(&self) -> Result<(), NetError> {
        let valid_target = self
            .target
            .rsplit_once(':')
            .is_some_and(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok());
        if !valid_target {
            return Err(NetError::InvalidTarget(self.target.clone()));
        }
        if self.interval_ms == 0 || self.timeout_ms == 0 {
            return Err(NetError::InvalidTiming(format!(
                "interval_ms={} timeout_ms={}",
                self.interval_ms, self.timeout_ms
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TcpProbe
// ---------------------------------------------------------------------------

/// Drives a [`ConnectivityMonitor`] from periodic TCP connects.
///
/// A successful connect within the timeout means online; refusal,
/// resolution failure, or timeout means offline. The first probe runs
/// immediately so the monitor is accurate shortly after startup.
pub struct TcpProbe;

impl TcpProbe {
    /// Connects once to `target` and reports whether it succeeded.
    pub async fn probe_once(target: &str, timeout: Duration) -> bool {
        match time::timeout(timeout, TcpStream::connect(target)).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                tracing::trace!(addr = target, error = %e, "probe connect failed");
                false
            }
            Err(_) => {
                tracing::trace!(addr = target, "probe timed out");
                false
            }
        }
    }

    /// Spawns the probe loop. It runs until the returned handle is
    /// dropped or [`ProbeHandle::stop`] is called.
    ///
    /// # Errors
    /// Returns a [`NetError`] if the config fails [`ProbeConfig::validate`].
    pub fn spawn(
        config: ProbeConfig,
        monitor: ConnectivityMonitor,
    ) -> Result<ProbeHandle, NetError> {
        config.validate()?;

        let interval = Duration::from_millis(config.interval_ms);
        let timeout = Duration::from_millis(config.timeout_ms);

        let task = tokio::spawn(async move {
            tracing::info!(addr = %config.target, ?interval, "connectivity probe started");

            let mut ticker = time::interval(interval);
            // A slow probe shouldn't trigger a burst of catch-up probes.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let online = Self::probe_once(&config.target, timeout).await;
                monitor.set_online(online);
            }
        });

        Ok(ProbeHandle { task })
    }
}

/// Owns a running probe task. Dropping it stops the probe.
#[derive(Debug)]
pub struct ProbeHandle {
    task: JoinHandle<()>,
}

impl ProbeHandle {
    /// Stops the probe. The monitor keeps its last value.
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for ProbeHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_host_port() {
        let cfg = ProbeConfig {
            target: "auth.example.com:443".into(),
            ..ProbeConfig::default()
        };
        assert!(cfg.validate().is_ok());
        assert!(ProbeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_port() {
        let cfg = ProbeConfig {
            target: "auth.example.com".into(),
            ..ProbeConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(NetError::InvalidTarget(_))));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let cfg = ProbeConfig {
            interval_ms: 0,
            ..ProbeConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(NetError::InvalidTiming(_))));
    }
}

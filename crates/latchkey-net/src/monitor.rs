//! The [`Connectivity`] trait and its watch-backed implementation.

use std::sync::Arc;

use tokio::sync::watch;

/// Answers "are we online right now?".
///
/// `is_online` is a synchronous read of the latest known state. The
/// controller samples it once per submit and never waits for it to
/// change. `subscribe` is for hosts that want to render a live
/// indicator.
pub trait Connectivity: Send + Sync + 'static {
    /// The most recently observed reachability.
    fn is_online(&self) -> bool;

    /// A receiver that observes every future change.
    fn subscribe(&self) -> watch::Receiver<bool>;
}

/// A shared online/offline flag.
///
/// Built on `tokio::sync::watch`: one value, many readers, and readers
/// can `.changed().await` to be woken on updates. Clones share the same
/// flag, so the probe task, the controller, and the UI all agree.
#[derive(Debug, Clone)]
pub struct ConnectivityMonitor {
    sender: Arc<watch::Sender<bool>>,
}

impl ConnectivityMonitor {
    /// Creates a monitor with the given initial state.
    pub fn new(online: bool) -> Self {
        let (sender, _) = watch::channel(online);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Updates the flag. Subscribers are only woken on an actual change.
    pub fn set_online(&self, online: bool) {
        let changed = self.sender.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });
        if changed {
            tracing::info!(online, "connectivity changed");
        }
    }
}

impl Default for ConnectivityMonitor {
    /// Optimistically online until something says otherwise.
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for ConnectivityMonitor {
    fn is_online(&self) -> bool {
        *self.sender.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_reports_initial_state() {
        assert!(ConnectivityMonitor::new(true).is_online());
        assert!(!ConnectivityMonitor::new(false).is_online());
        assert!(ConnectivityMonitor::default().is_online());
    }

    #[test]
    fn test_set_online_visible_through_clones() {
        let monitor = ConnectivityMonitor::new(true);
        let reader = monitor.clone();

        monitor.set_online(false);

        assert!(!reader.is_online());
    }

    #[tokio::test]
    async fn test_subscribe_wakes_on_change_only() {
        let monitor = ConnectivityMonitor::new(true);
        let mut rx = monitor.subscribe();

        // Same value: no notification.
        monitor.set_online(true);
        assert!(!rx.has_changed().unwrap());

        monitor.set_online(false);
        rx.changed().await.unwrap();
        assert!(!*rx.borrow_and_update());
    }
}

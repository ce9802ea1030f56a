//! One-shot navigation signals.
//!
//! A successful login has to move the user off the login screen exactly
//! once. Deriving that from the state ("error cleared and not loading")
//! misfires on unrelated transitions, so success is reported on its own
//! channel instead.
//!
//! The channel is a bounded mpsc queue with a single receiver. Each
//! signal is delivered to exactly one observer, at most once. Signals
//! sent before the observer starts listening wait in the queue (up to
//! `navigation_buffer`); past that they're dropped rather than piling up.

use tokio::sync::mpsc::{self, error::TrySendError};

/// Why the controller is asking to navigate away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationReason {
    /// The user submitted credentials and the auth service accepted them.
    SignedIn,
    /// A remembered token was found at startup (auto-login).
    RememberedToken,
}

/// A single navigation signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationEvent {
    pub reason: NavigationReason,
}

/// Sending half, owned by the controller task.
#[derive(Debug)]
pub(crate) struct Navigator {
    sender: mpsc::Sender<NavigationEvent>,
}

impl Navigator {
    pub(crate) fn emit(&self, reason: NavigationReason) {
        match self.sender.try_send(NavigationEvent { reason }) {
            Ok(()) => tracing::info!(?reason, "navigation signal emitted"),
            Err(TrySendError::Full(_)) => {
                tracing::warn!(?reason, "navigation queue full, signal dropped");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(?reason, "no navigation observer, signal dropped");
            }
        }
    }
}

/// Receiving half, handed to the presentation layer.
///
/// There is exactly one of these per controller. It isn't `Clone`; that
/// is what keeps delivery single-consumer.
#[derive(Debug)]
pub struct NavigationEvents {
    receiver: mpsc::Receiver<NavigationEvent>,
}

impl NavigationEvents {
    /// Waits for the next signal. Returns `None` once the controller has
    /// stopped and every queued signal has been taken.
    pub async fn next(&mut self) -> Option<NavigationEvent> {
        self.receiver.recv().await
    }

    /// Takes a queued signal without waiting.
    pub fn try_next(&mut self) -> Option<NavigationEvent> {
        self.receiver.try_recv().ok()
    }
}

/// Creates a connected navigator/observer pair.
pub(crate) fn channel(capacity: usize) -> (Navigator, NavigationEvents) {
    let (sender, receiver) = mpsc::channel(capacity);
    (Navigator { sender }, NavigationEvents { receiver })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_delivers_exactly_once() {
        let (nav, mut events) = channel(4);

        nav.emit(NavigationReason::SignedIn);

        assert_eq!(
            events.next().await,
            Some(NavigationEvent {
                reason: NavigationReason::SignedIn
            })
        );
        assert!(events.try_next().is_none());
    }

    #[test]
    fn test_emit_beyond_capacity_drops_newest() {
        let (nav, mut events) = channel(1);

        nav.emit(NavigationReason::RememberedToken);
        nav.emit(NavigationReason::SignedIn);

        assert_eq!(
            events.try_next().map(|e| e.reason),
            Some(NavigationReason::RememberedToken)
        );
        assert!(events.try_next().is_none());
    }

    #[test]
    fn test_emit_without_observer_does_not_panic() {
        let (nav, events) = channel(1);
        drop(events);
        nav.emit(NavigationReason::SignedIn);
    }

    #[tokio::test]
    async fn test_next_returns_none_after_navigator_dropped() {
        let (nav, mut events) = channel(1);
        nav.emit(NavigationReason::SignedIn);
        drop(nav);

        assert!(events.next().await.is_some(), "queued signal survives");
        assert!(events.next().await.is_none());
    }
}

//! Error types for the network layer.

/// Errors that can occur while setting up reachability checks.
///
/// Probing itself never fails: an unreachable target just means
/// "offline". Only a bad configuration is an error.
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    /// The probe target isn't a `host:port` pair.
    #[error("invalid probe target {0:?}: expected host:port")]
    InvalidTarget(String),

    /// The probe interval or timeout is zero.
    #[error("invalid probe timing: {0}")]
    InvalidTiming(String),
}

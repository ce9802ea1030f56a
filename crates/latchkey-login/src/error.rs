//! Error types for the login layer.

/// Errors returned by [`LoginHandle`](crate::LoginHandle) calls.
///
/// Everything that goes wrong *inside* a login (bad password, offline,
/// locked out, store I/O) is reported through the state, never as an
/// error. The only thing a caller can trip over is talking to a
/// controller that is no longer running.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// The controller task has stopped (shut down, or its runtime went
    /// away). Further commands are discarded.
    #[error("login controller is closed")]
    ControllerClosed,
}

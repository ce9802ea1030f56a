//! Network reachability for Latchkey.
//!
//! The login controller refuses to call the auth service while the
//! device is offline. It asks a [`Connectivity`] oracle, which answers
//! synchronously with the latest known state and can also be watched
//! for changes.
//!
//! - [`ConnectivityMonitor`]: the shared online/offline flag. Hosts
//!   (or tests) flip it directly.
//! - [`TcpProbe`]: keeps a monitor up to date by periodically opening a
//!   TCP connection to a known endpoint.

mod error;
mod monitor;
mod probe;

pub use error::NetError;
pub use monitor::{Connectivity, ConnectivityMonitor};
pub use probe::{ProbeConfig, ProbeHandle, TcpProbe};

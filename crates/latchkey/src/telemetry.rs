//! Logging setup for hosts.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

/// Installs a `tracing` subscriber that writes to stderr.
///
/// The filter comes from `RUST_LOG` (e.g. `RUST_LOG=latchkey_login=debug`)
/// and falls back to [`DEFAULT_FILTER`]. Calling this twice is harmless:
/// the second call finds a subscriber already installed and returns
/// `false`.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_second_call_is_noop() {
        init_tracing();
        assert!(!init_tracing());
    }
}

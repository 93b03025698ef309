//! Diagnostic stream setup
//!
//! The logger reports its own failures (rotation, writes, sweeps) through
//! `tracing`. This installs a subscriber that prints them to stderr.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_DIAGNOSTIC_FILTER: &str = "daylog=info";

/// Send `tracing` output to stderr, filtered by `RUST_LOG`
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_diagnostics() -> bool {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_DIAGNOSTIC_FILTER.into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_diagnostics_only_once() {
        init_diagnostics();
        assert!(!init_diagnostics());
    }
}

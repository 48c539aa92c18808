#![forbid(unsafe_code)]

//! Subscriber setup for the CLI host.

use tracing_subscriber::{EnvFilter, fmt};

/// Filter variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "MVIZ_LOG";

/// Build the filter: `MVIZ_LOG`, then `RUST_LOG`, then `info` (`warn` when quiet).
pub fn env_filter(quiet: bool) -> EnvFilter {
    let fallback = if quiet { "warn" } else { "info" };
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install a stderr `fmt` subscriber. A second call is a no-op.
pub fn init(quiet: bool) {
    let _ = fmt()
        .with_env_filter(env_filter(quiet))
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .try_init();
}

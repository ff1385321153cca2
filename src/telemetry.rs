//! Structured logging initialization.

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Log level defaults to `info` and
/// is overridden with the standard `RUST_LOG` filter syntax.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

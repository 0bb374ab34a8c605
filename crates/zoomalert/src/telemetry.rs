//! Tracing subscriber setup
//!
//! Installs a fmt subscriber honoring `RUST_LOG` when set, falling back to
//! the configured default level otherwise. Safe to call more than once; only
//! the first call installs a subscriber.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize logging with the given default level (e.g. `"info"`).
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

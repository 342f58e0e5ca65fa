//! Logger of the system.

pub use tracing::{debug, error, event as log, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global tracing subscriber, reading the filter from
/// `RUST_LOG` and defaulting to `info` for our own crates.
///
/// Returns quietly if a subscriber is already installed, so tests can call
/// it repeatedly.
pub fn setup() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

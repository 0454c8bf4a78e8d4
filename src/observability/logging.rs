//! Structured logging.
//!
//! # Responsibilities
//! - Install the process-wide `tracing` subscriber for binaries
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber is the binary's call
//! - `RUST_LOG` wins over the default filter passed in

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a fmt subscriber filtered by `RUST_LOG`, or `default_filter` when
/// it is unset. Returns `false` if a global subscriber was already installed.
pub fn init_logging(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Coordinator, servers, interceptors produce:
//!     → tracing events (structured fields)
//!     → metrics.rs (gauges, counters, histogram on a private recorder)
//!
//! Consumers:
//!     → logging.rs subscriber (binaries only)
//!     → /metrics probe (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Metric updates are atomic stores on pre-resolved handles
//! - Metrics are opt-in per coordinator

pub mod logging;
pub mod metrics;

pub use self::metrics::Metrics;

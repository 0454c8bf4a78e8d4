//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (registry.rs):
//!     wrap_http / wrap_stream / register → append-only server list
//!
//! Triggers (signals.rs, shutdown.rs):
//!     SIGTERM/SIGINT ─┐
//!     cancel future ──┼─▶ Graceful::trigger (once) ─▶ drain task
//!     shutdown() ─────┘
//!
//! Drain (shutdown.rs):
//!     Readiness false → LB delay → stop servers ┐ shared deadline
//!                                 → wait in-flight ┘
//!     → hard stop delay → Stopped(report)
//! ```
//!
//! # Design Decisions
//! - Exactly-once via compare-and-swap; every caller awaits the same
//!   completion signal and gets the same report
//! - The drain runs in its own task, so it completes even if every caller
//!   stops waiting
//! - Every phase is bounded; a missed deadline moves on instead of failing

pub mod registry;
pub mod shutdown;
pub mod signals;

pub use registry::{ServerKind, ServerRegistry, TrackedServer};
pub use shutdown::{Graceful, Phase, ShutdownReport};
pub use signals::TerminationSignal;

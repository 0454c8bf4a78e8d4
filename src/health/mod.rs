//! Health reporting subsystem.
//!
//! # Data Flow
//! ```text
//! Orchestrator probe
//!     → probes.rs (route or transport-agnostic ProbeResponse)
//!     → readiness.rs (lock-free read)
//!     → 200 "ready" / 503 "draining"
//!
//! Shutdown coordinator
//!     → readiness.rs mark_draining (once, first step of the drain)
//! ```
//!
//! # Design Decisions
//! - Liveness is independent of draining: a draining process is still alive
//! - Only the coordinator can flip readiness

pub mod probes;
pub mod readiness;

pub use probes::ProbeResponse;
pub use readiness::ReadinessFlag;

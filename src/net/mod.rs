//! Network plumbing shared by every server kind.
//!
//! # Data Flow
//! ```text
//! wrap_http / serve_stream
//!     → listener.rs (bind, report bind errors synchronously)
//!     → server accept loop
//!     → inflight.rs (one guard per accepted request or stream)
//!     → guard dropped on completion → count decremented
//!     → count hits zero → drain waiter woken
//! ```
//!
//! # Design Decisions
//! - One counter per coordinator, shared by all of its servers
//! - Scoped guards are the only way servers touch the counter

pub mod inflight;
pub mod listener;

pub use inflight::{InFlightCounter, InFlightGuard};

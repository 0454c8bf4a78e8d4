//! Request/response server support.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum::serve with a graceful-shutdown trigger)
//!     → middleware/tracking.rs (guard per request)
//!     → application Router
//!     → response → guard dropped
//! ```
//!
//! # Design Decisions
//! - Tracking is a tower layer so it wraps any Router without the
//!   application noticing
//! - A server that misses the drain deadline keeps serving its accepted
//!   connections; only stream servers are force-stopped

pub mod middleware;
pub mod server;

pub use middleware::InFlightLayer;
pub use server::HttpServerHandle;

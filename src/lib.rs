//! Graceful shutdown for Tokio network services.
//!
//! Wrap HTTP routers and WebSocket stream servers with a [`Graceful`]
//! coordinator; on SIGTERM/SIGINT (or an explicit call) it flips readiness,
//! stops every server from accepting, waits for in-flight work within a
//! bounded drain window, and reports how it went.

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod stream;

pub use config::GracefulConfig;
pub use error::{GracefulError, StopError};
pub use lifecycle::{Graceful, Phase, ServerKind, ShutdownReport, TrackedServer};
pub use stream::{ServerStream, StreamServer};

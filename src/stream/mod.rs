//! Persistent-stream server support.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, WebSocket handshake)
//!     → tracked.rs (one in-flight guard per stream, if built with an interceptor)
//!     → handler(ServerStream) (messages forwarded untouched)
//!     → stream dropped → guard dropped
//! ```
//!
//! # Design Decisions
//! - Tracking is per stream, not per message: a stream that stays open keeps
//!   the drain waiting until the deadline
//! - Interception is chosen when the server is built, never retrofitted
//! - Missing the drain deadline escalates to aborting open streams

pub mod server;
pub mod tracked;

pub use server::{StreamServer, StreamServerBuilder, StreamServerHandle};
pub use tracked::{ServerStream, StreamInterceptor};

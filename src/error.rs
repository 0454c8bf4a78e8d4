//! Error types shared across the crate.
//!
//! Only setup failures are surfaced to callers. Everything that goes wrong
//! once a server is running (accept errors, missed drain deadlines) is logged
//! by the component that observes it.

use thiserror::Error;

/// Errors returned when wrapping or starting a server.
#[derive(Debug, Error)]
pub enum GracefulError {
    /// The listening endpoint could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// A pre-bound listener could not be inspected.
    #[error("listener error: {0}")]
    Listener(#[from] std::io::Error),
}

/// Outcome of asking a single server to stop accepting work.
#[derive(Debug, Error)]
pub enum StopError {
    /// Accepted work was still running when the drain deadline passed.
    #[error("server did not stop before the drain deadline")]
    DeadlineExceeded,

    /// The serve task ended abnormally.
    #[error("server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

//! OS signal handling.
//!
//! # Responsibilities
//! - Listen for SIGTERM and SIGINT (Ctrl+C on non-unix targets)
//! - Report which one arrived
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe); every listener sees every
//!   delivery, so each `Graceful::wait` call gets its own listener. Let one
//!   coordinator own the signal lifecycle of a process.
//! - A listener that cannot be registered logs an error and never fires,
//!   leaving the other trigger sources usable

use std::fmt;

/// A termination request from the operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationSignal {
    Terminate,
    Interrupt,
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationSignal::Terminate => write!(f, "SIGTERM"),
            TerminationSignal::Interrupt => write!(f, "SIGINT"),
        }
    }
}

/// Resolve on the first SIGTERM or SIGINT delivered after this is polled.
#[cfg(unix)]
pub async fn termination() -> TerminationSignal {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigterm, mut sigint) =
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!(error = %e, "Failed to register signal handlers");
                return std::future::pending().await;
            }
        };

    tokio::select! {
        _ = sigterm.recv() => TerminationSignal::Terminate,
        _ = sigint.recv() => TerminationSignal::Interrupt,
    }
}

#[cfg(not(unix))]
pub async fn termination() -> TerminationSignal {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return std::future::pending().await;
    }
    TerminationSignal::Interrupt
}

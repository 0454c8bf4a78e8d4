//! Registry of servers under lifecycle management.
//!
//! # Responsibilities
//! - Hold every wrapped server until process exit (append-only)
//! - Record the address each server listens on
//! - Hand the shutdown coordinator a snapshot to stop

use async_trait::async_trait;
use parking_lot::Mutex;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::time::Instant;

use crate::error::StopError;

/// Which escalation policy applies when a server misses the drain deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerKind {
    /// Request/response: accepted requests are left to finish on their own.
    Http,
    /// Persistent streams: open streams are aborted at the deadline.
    Stream,
}

impl fmt::Display for ServerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerKind::Http => write!(f, "http"),
            ServerKind::Stream => write!(f, "stream"),
        }
    }
}

/// A server the coordinator can drain.
#[async_trait]
pub trait TrackedServer: Send + Sync + fmt::Debug {
    fn kind(&self) -> ServerKind;

    /// Address the server accepts connections on, if it has one.
    fn local_addr(&self) -> Option<SocketAddr>;

    /// Stop accepting new work, then wait for accepted work to finish.
    ///
    /// Must return by `deadline`: `Err(StopError::DeadlineExceeded)` if work
    /// is still running then.
    async fn stop_accepting(&self, deadline: Instant) -> Result<(), StopError>;

    /// Abort whatever is still running. Called after a missed deadline.
    fn force_stop(&self);
}

#[derive(Debug, Default)]
pub struct ServerRegistry {
    servers: Mutex<Vec<Arc<dyn TrackedServer>>>,
}

impl ServerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, server: Arc<dyn TrackedServer>) {
        tracing::debug!(
            kind = %server.kind(),
            address = ?server.local_addr(),
            "Server registered"
        );
        self.servers.lock().push(server);
    }

    /// Copy of the registered servers, in registration order.
    pub fn snapshot(&self) -> Vec<Arc<dyn TrackedServer>> {
        self.servers.lock().clone()
    }

    /// Addresses of every registered listener, in registration order.
    pub fn listeners(&self) -> Vec<SocketAddr> {
        self.servers
            .lock()
            .iter()
            .filter_map(|server| server.local_addr())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.servers.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.lock().is_empty()
    }
}

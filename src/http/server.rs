//! Tracked HTTP server.
//!
//! # Responsibilities
//! - Serve an axum `Router` on a bound listener in a background task
//! - Stop accepting on request and let accepted requests finish
//! - Report whether that finished before the drain deadline
//!
//! Serving errors after startup are logged, never returned.

use async_trait::async_trait;
use axum::Router;
use parking_lot::Mutex;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};
use tokio::time::Instant;

use crate::error::StopError;
use crate::lifecycle::registry::{ServerKind, TrackedServer};

/// Handle to an HTTP server running in the background.
#[derive(Debug)]
pub struct HttpServerHandle {
    addr: SocketAddr,
    stop_tx: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
    abort: AbortHandle,
}

impl HttpServerHandle {
    /// Start serving `router` on `listener`.
    ///
    /// The router is served as given; in-flight tracking is installed by the
    /// caller (see [`crate::Graceful::wrap_http`]).
    pub fn spawn(router: Router, listener: TcpListener) -> std::io::Result<Arc<Self>> {
        let addr = listener.local_addr()?;
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            tracing::info!(address = %addr, "HTTP server starting");

            let stopped = async move {
                // An error means the handle is gone, which is also a reason to stop.
                let _ = stop_rx.wait_for(|stop| *stop).await;
            };

            if let Err(e) = axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(stopped)
                .await
            {
                tracing::error!(address = %addr, error = %e, "HTTP server error");
            }

            tracing::info!(address = %addr, "HTTP server stopped");
        });

        Ok(Arc::new(Self {
            addr,
            stop_tx,
            abort: task.abort_handle(),
            task: Mutex::new(Some(task)),
        }))
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }
}

#[async_trait]
impl TrackedServer for HttpServerHandle {
    fn kind(&self) -> ServerKind {
        ServerKind::Http
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        Some(self.addr)
    }

    async fn stop_accepting(&self, deadline: Instant) -> Result<(), StopError> {
        self.stop_tx.send_replace(true);

        let task = self.task.lock().take();
        let Some(mut task) = task else {
            return Ok(());
        };

        match tokio::time::timeout_at(deadline, &mut task).await {
            Ok(joined) => joined.map_err(StopError::from),
            Err(_) => {
                *self.task.lock() = Some(task);
                Err(StopError::DeadlineExceeded)
            }
        }
    }

    fn force_stop(&self) {
        self.abort.abort();
    }
}

//! Persistent-stream (WebSocket) server.
//!
//! # Responsibilities
//! - Accept TCP connections and complete the WebSocket handshake
//! - Run one handler task per stream
//! - Graceful stop: close the listener, let open streams finish
//! - Forced stop: abort every open stream
//!
//! # Data Flow
//! ```text
//! accept → on_accept guard (if tracked) → handshake → handler(ServerStream)
//!                                                          │
//! stop_accepting ──▶ listener dropped ──▶ wait for handlers ┤
//! force_stop ──────────────────────────▶ abort handlers ────┘
//! ```

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time::Instant;

use crate::error::StopError;
use crate::lifecycle::registry::{ServerKind, TrackedServer};
use crate::stream::tracked::{ServerStream, StreamInterceptor};

type StreamHandler = Arc<dyn Fn(ServerStream) -> BoxFuture<'static, ()> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopMode {
    Running,
    Graceful,
    Force,
}

/// A stream server that has not started serving yet.
pub struct StreamServer {
    handler: StreamHandler,
    interceptor: Option<StreamInterceptor>,
}

impl StreamServer {
    /// Server without in-flight tracking. Registering it with a coordinator
    /// manages its lifecycle only; use
    /// [`Graceful::new_stream_server`](crate::Graceful::new_stream_server)
    /// to get a tracked one.
    pub fn new<F, Fut>(handler: F) -> Self
    where
        F: Fn(ServerStream) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::builder().handler(handler)
    }

    pub fn builder() -> StreamServerBuilder {
        StreamServerBuilder { interceptor: None }
    }

    pub fn is_tracked(&self) -> bool {
        self.interceptor.is_some()
    }

    /// Start serving on `listener` in a background task.
    pub fn spawn(self, listener: TcpListener) -> std::io::Result<Arc<StreamServerHandle>> {
        let addr = listener.local_addr()?;
        let (control, control_rx) = watch::channel(StopMode::Running);

        let task = tokio::spawn(serve(
            listener,
            addr,
            self.handler,
            self.interceptor,
            control_rx,
        ));

        Ok(Arc::new(StreamServerHandle {
            addr,
            control,
            task: Mutex::new(Some(task)),
        }))
    }
}

impl fmt::Debug for StreamServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamServer")
            .field("tracked", &self.is_tracked())
            .finish_non_exhaustive()
    }
}

/// Builds a [`StreamServer`]; interception is fixed once built.
#[derive(Debug, Default)]
pub struct StreamServerBuilder {
    interceptor: Option<StreamInterceptor>,
}

impl StreamServerBuilder {
    pub fn interceptor(mut self, interceptor: StreamInterceptor) -> Self {
        self.interceptor = Some(interceptor);
        self
    }

    pub fn handler<F, Fut>(self, handler: F) -> StreamServer
    where
        F: Fn(ServerStream) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        StreamServer {
            handler: Arc::new(move |stream: ServerStream| -> BoxFuture<'static, ()> {
                Box::pin(handler(stream))
            }),
            interceptor: self.interceptor,
        }
    }
}

/// Handle to a stream server running in the background.
#[derive(Debug)]
pub struct StreamServerHandle {
    addr: SocketAddr,
    control: watch::Sender<StopMode>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl StreamServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }
}

#[async_trait]
impl TrackedServer for StreamServerHandle {
    fn kind(&self) -> ServerKind {
        ServerKind::Stream
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        Some(self.addr)
    }

    async fn stop_accepting(&self, deadline: Instant) -> Result<(), StopError> {
        self.control.send_if_modified(|mode| {
            if *mode == StopMode::Running {
                *mode = StopMode::Graceful;
                true
            } else {
                false
            }
        });

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
        self.control.send_replace(StopMode::Force);
    }
}

async fn serve(
    listener: TcpListener,
    addr: SocketAddr,
    handler: StreamHandler,
    interceptor: Option<StreamInterceptor>,
    mut control: watch::Receiver<StopMode>,
) {
    tracing::info!(
        address = %addr,
        tracked = interceptor.is_some(),
        "Stream server starting"
    );

    let mut streams = JoinSet::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((tcp, peer_addr)) => {
                    let guard = interceptor.as_ref().map(StreamInterceptor::on_accept);
                    let handler = Arc::clone(&handler);
                    streams.spawn(async move {
                        match tokio_tungstenite::accept_async(tcp).await {
                            Ok(ws) => handler(ServerStream::new(ws, peer_addr, guard)).await,
                            Err(e) => tracing::debug!(
                                peer_addr = %peer_addr,
                                error = %e,
                                "WebSocket handshake failed"
                            ),
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(address = %addr, error = %e, "Failed to accept connection");
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
            },
            Some(joined) = streams.join_next(), if !streams.is_empty() => log_stream_exit(joined),
            _ = control.changed() => break,
        }
    }

    drop(listener);
    tracing::info!(
        address = %addr,
        open_streams = streams.len(),
        "Stream server stopped accepting"
    );

    let mut forced = false;
    loop {
        tokio::select! {
            joined = streams.join_next() => match joined {
                Some(joined) => log_stream_exit(joined),
                None => break,
            },
            _ = control.wait_for(|mode| *mode == StopMode::Force), if !forced => {
                forced = true;
                tracing::warn!(
                    address = %addr,
                    open_streams = streams.len(),
                    "Aborting open streams"
                );
                streams.abort_all();
            }
        }
    }

    tracing::info!(address = %addr, forced, "Stream server stopped");
}

fn log_stream_exit(joined: Result<(), JoinError>) {
    match joined {
        Ok(()) => {}
        Err(e) if e.is_panic() => tracing::warn!(error = %e, "Stream handler panicked"),
        Err(_) => tracing::trace!("Stream aborted"),
    }
}

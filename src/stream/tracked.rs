//! In-flight tracking for persistent streams.
//!
//! A stream counts as one in-flight operation from TCP accept until the
//! [`ServerStream`] is dropped, however many messages it carries. Messages
//! pass through untouched.

use futures_util::{Sink, Stream};
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::WebSocketStream;

use crate::lifecycle::registry::ServerKind;
use crate::net::{InFlightCounter, InFlightGuard};
use crate::observability::Metrics;

/// Begins one in-flight operation per accepted stream.
///
/// Installed into a [`StreamServer`](crate::stream::StreamServer) when it is
/// built; it cannot be added to a server afterwards.
#[derive(Debug, Clone)]
pub struct StreamInterceptor {
    counter: Arc<InFlightCounter>,
    metrics: Option<Arc<Metrics>>,
}

impl StreamInterceptor {
    pub fn new(counter: Arc<InFlightCounter>, metrics: Option<Arc<Metrics>>) -> Self {
        Self { counter, metrics }
    }

    /// Called once per accepted connection.
    pub fn on_accept(&self) -> InFlightGuard {
        let guard = self.counter.track();
        if let Some(metrics) = &self.metrics {
            metrics.record_request(ServerKind::Stream);
        }
        guard
    }
}

/// A server-side WebSocket stream handed to stream handlers.
///
/// Implements `Stream` and `Sink` by forwarding to the underlying
/// `WebSocketStream`. Holds the stream's in-flight guard, if any.
pub struct ServerStream {
    inner: WebSocketStream<TcpStream>,
    peer_addr: SocketAddr,
    guard: Option<InFlightGuard>,
}

impl ServerStream {
    pub(crate) fn new(
        inner: WebSocketStream<TcpStream>,
        peer_addr: SocketAddr,
        guard: Option<InFlightGuard>,
    ) -> Self {
        Self {
            inner,
            peer_addr,
            guard,
        }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Whether this stream counts toward the drain.
    pub fn is_tracked(&self) -> bool {
        self.guard.is_some()
    }
}

impl std::fmt::Debug for ServerStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerStream")
            .field("peer_addr", &self.peer_addr)
            .field("tracked", &self.is_tracked())
            .finish_non_exhaustive()
    }
}

impl Stream for ServerStream {
    type Item = Result<Message, WsError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }
}

impl Sink<Message> for ServerStream {
    type Error = WsError;

    fn poll_ready(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Pin::new(&mut self.get_mut().inner).poll_ready(cx)
    }

    fn start_send(self: Pin<&mut Self>, item: Message) -> Result<(), Self::Error> {
        Pin::new(&mut self.get_mut().inner).start_send(item)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_close(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Pin::new(&mut self.get_mut().inner).poll_close(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interceptor_counts_each_accept() {
        let counter = Arc::new(InFlightCounter::new());
        let metrics = Arc::new(Metrics::new().unwrap());
        let interceptor = StreamInterceptor::new(Arc::clone(&counter), Some(Arc::clone(&metrics)));

        let first = interceptor.on_accept();
        let second = interceptor.on_accept();
        assert_eq!(counter.count(), 2);
        assert!(metrics.render().contains("gracewrap_stream_requests_total 2"));

        drop(first);
        drop(second);
        assert_eq!(counter.count(), 0);
    }
}

//! In-flight tracking for request/response services.
//!
//! The guard is taken in `call`, before the inner future exists, and moved
//! into the returned future. Completing the future, failing, panicking or
//! being dropped mid-flight (client went away) all release it exactly once.
//!
//! The guard covers the service future only. A streamed response body that
//! is still being written after the handler returned no longer counts; the
//! server's own graceful stop waits for those connections.

use futures_util::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::lifecycle::registry::ServerKind;
use crate::net::InFlightCounter;
use crate::observability::Metrics;

/// Layer that counts every request passing through it as in flight.
#[derive(Debug, Clone)]
pub struct InFlightLayer {
    counter: Arc<InFlightCounter>,
    metrics: Option<Arc<Metrics>>,
}

impl InFlightLayer {
    pub fn new(counter: Arc<InFlightCounter>, metrics: Option<Arc<Metrics>>) -> Self {
        Self { counter, metrics }
    }
}

impl<S> Layer<S> for InFlightLayer {
    type Service = InFlightService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InFlightService {
            inner,
            counter: Arc::clone(&self.counter),
            metrics: self.metrics.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InFlightService<S> {
    inner: S,
    counter: Arc<InFlightCounter>,
    metrics: Option<Arc<Metrics>>,
}

impl<S, Request> Service<Request> for InFlightService<S>
where
    S: Service<Request> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let guard = self.counter.track();
        if let Some(metrics) = &self.metrics {
            metrics.record_request(ServerKind::Http);
        }

        // The clone is not necessarily ready; keep the one poll_ready was called on.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let future = inner.call(req);

        Box::pin(async move {
            let _guard = guard;
            future.await
        })
    }
}

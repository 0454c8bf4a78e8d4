//! Shutdown coordination.
//!
//! [`Graceful`] owns the readiness flag, the in-flight counter, the server
//! registry and the metrics for one process, and runs the drain sequence
//! exactly once:
//!
//! ```text
//! trigger ──▶ readiness = false ──▶ load balancer delay
//!         ──▶ every server stops accepting  ┐ shared deadline
//!         ──▶ wait for in-flight == 0       ┘ (now + drain_timeout)
//!         ──▶ hard stop delay ──▶ record duration ──▶ Stopped
//! ```
//!
//! Nothing in the sequence aborts it. Missed deadlines and server errors are
//! logged and reflected in the [`ShutdownReport`].

use axum::Router;
use futures_util::future::join_all;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::time::Instant;

use crate::config::GracefulConfig;
use crate::error::{GracefulError, StopError};
use crate::health::{probes, ProbeResponse, ReadinessFlag};
use crate::http::{HttpServerHandle, InFlightLayer};
use crate::lifecycle::registry::{ServerKind, ServerRegistry, TrackedServer};
use crate::lifecycle::signals;
use crate::net::{listener, InFlightCounter, InFlightGuard};
use crate::observability::Metrics;
use crate::stream::{ServerStream, StreamInterceptor, StreamServer};

/// Where a coordinator is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Running,
    Draining,
    Stopped(ShutdownReport),
}

impl Phase {
    /// Whether the drain sequence has finished.
    pub fn is_stopped(&self) -> bool {
        matches!(self, Phase::Stopped(_))
    }

    /// The shutdown report, once stopped.
    pub fn report(&self) -> Option<&ShutdownReport> {
        match self {
            Phase::Stopped(report) => Some(report),
            _ => None,
        }
    }
}

/// Outcome of the drain sequence, shared with every caller that awaited it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShutdownReport {
    /// From trigger to completion, including all configured delays.
    pub duration: Duration,
    /// Whether the in-flight count reached zero before the deadline.
    pub drained: bool,
    /// In-flight operations still running when the wait ended.
    pub remaining: u64,
    /// Stream servers that had to be force-stopped.
    pub forced_servers: usize,
}

/// Graceful shutdown coordinator. Cheap to clone; clones share state.
#[derive(Debug, Clone)]
pub struct Graceful {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    config: GracefulConfig,
    readiness: ReadinessFlag,
    inflight: Arc<InFlightCounter>,
    registry: ServerRegistry,
    metrics: Option<Arc<Metrics>>,
    triggered: AtomicBool,
    phase: watch::Sender<Phase>,
}

impl Graceful {
    /// Coordinator for `config`. Builds a private metrics recorder when
    /// metrics are enabled.
    pub fn new(config: GracefulConfig) -> Self {
        let metrics = if config.enable_metrics {
            match Metrics::new() {
                Ok(metrics) => Some(Arc::new(metrics)),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to build metrics recorder, metrics disabled");
                    None
                }
            }
        } else {
            None
        };

        tracing::info!(
            drain_timeout = ?config.drain_timeout,
            hard_stop_timeout = ?config.hard_stop_timeout,
            load_balancer_delay = ?config.load_balancer_delay,
            metrics = metrics.is_some(),
            "Graceful coordinator created"
        );

        let (phase, _) = watch::channel(Phase::Running);

        Self {
            inner: Arc::new(Inner {
                inflight: Arc::new(InFlightCounter::with_metrics(metrics.clone())),
                config,
                readiness: ReadinessFlag::new(),
                registry: ServerRegistry::new(),
                metrics,
                triggered: AtomicBool::new(false),
                phase,
            }),
        }
    }

    /// Coordinator configured from defaults plus environment variables.
    pub fn from_env() -> Self {
        Self::new(GracefulConfig::from_env())
    }

    /// Configuration this coordinator was built with.
    pub fn config(&self) -> &GracefulConfig {
        &self.inner.config
    }

    /// `true` until shutdown starts, `false` for ever after.
    pub fn is_ready(&self) -> bool {
        self.inner.readiness.is_ready()
    }

    /// Read-only handle on the readiness flag.
    pub fn readiness(&self) -> ReadinessFlag {
        self.inner.readiness.clone()
    }

    /// Requests, streams and tracked work currently in flight.
    pub fn in_flight(&self) -> u64 {
        self.inner.inflight.count()
    }

    /// Current lifecycle phase, cloned out of the watch channel.
    pub fn phase(&self) -> Phase {
        self.inner.phase.borrow().clone()
    }

    /// The coordinator's metrics, when enabled and successfully built.
    pub fn metrics(&self) -> Option<&Metrics> {
        self.inner.metrics.as_deref()
    }

    /// Addresses of every registered server, in registration order.
    pub fn listeners(&self) -> Vec<SocketAddr> {
        self.inner.registry.listeners()
    }

    /// Count application work (not tied to a request) as in flight until the
    /// guard is dropped.
    pub fn track(&self) -> InFlightGuard {
        self.inner.inflight.track()
    }

    /// Tower layer that tracks requests through any service.
    pub fn http_layer(&self) -> InFlightLayer {
        InFlightLayer::new(
            Arc::clone(&self.inner.inflight),
            self.inner.metrics.clone(),
        )
    }

    /// Interceptor for stream servers assembled by hand through
    /// [`StreamServer::builder`].
    pub fn stream_interceptor(&self) -> StreamInterceptor {
        StreamInterceptor::new(
            Arc::clone(&self.inner.inflight),
            self.inner.metrics.clone(),
        )
    }

    // ---------------------------------------------------------------------
    // Probes
    // ---------------------------------------------------------------------

    /// 200 `ready` while running, 503 `draining` once shutdown starts.
    pub fn readiness_probe(&self) -> ProbeResponse {
        probes::readiness(&self.inner.readiness)
    }

    /// Always 200 `alive`, including during the drain.
    pub fn liveness_probe(&self) -> ProbeResponse {
        probes::liveness()
    }

    /// Prometheus exposition text, or 404 when metrics are disabled.
    pub fn metrics_probe(&self) -> ProbeResponse {
        probes::metrics(self.metrics())
    }

    /// `/health/ready`, `/health/live` and `/metrics` for this coordinator.
    pub fn health_routes(&self) -> Router {
        probes::routes(self.clone())
    }

    // ---------------------------------------------------------------------
    // Server wrapping
    // ---------------------------------------------------------------------

    /// Bind `addr`, serve `router` on it with in-flight tracking, and register
    /// the server for draining. Returns the bound address.
    ///
    /// A bind failure is returned and nothing is started or registered.
    pub async fn wrap_http(&self, router: Router, addr: &str) -> Result<SocketAddr, GracefulError> {
        let (listener, _) = listener::bind(addr).await?;
        self.wrap_http_with_listener(router, listener)
    }

    /// Like [`wrap_http`](Self::wrap_http) with a listener the caller bound.
    pub fn wrap_http_with_listener(
        &self,
        router: Router,
        listener: TcpListener,
    ) -> Result<SocketAddr, GracefulError> {
        let server = HttpServerHandle::spawn(router.layer(self.http_layer()), listener)?;
        let addr = server.local_addr();
        self.register(server);
        Ok(addr)
    }

    /// Stream server with in-flight tracking built in, ready for
    /// [`wrap_stream`](Self::wrap_stream).
    pub fn new_stream_server<F, Fut>(&self, handler: F) -> StreamServer
    where
        F: Fn(ServerStream) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        StreamServer::builder()
            .interceptor(self.stream_interceptor())
            .handler(handler)
    }

    /// Bind `addr` and serve a tracked stream server running `handler` for
    /// each stream. Returns the bound address.
    pub async fn serve_stream<F, Fut>(&self, addr: &str, handler: F) -> Result<SocketAddr, GracefulError>
    where
        F: Fn(ServerStream) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (listener, _) = listener::bind(addr).await?;
        self.wrap_stream(self.new_stream_server(handler), listener)
    }

    /// Serve an already built stream server and register it for draining.
    ///
    /// Servers built with [`StreamServer::new`] keep their streams out of the
    /// in-flight count: only their lifecycle is managed.
    pub fn wrap_stream(
        &self,
        server: StreamServer,
        listener: TcpListener,
    ) -> Result<SocketAddr, GracefulError> {
        if !server.is_tracked() {
            tracing::warn!(
                "Stream server has no in-flight interceptor, only its lifecycle will be managed. \
                 Build it with Graceful::new_stream_server to track streams"
            );
        }

        let server = server.spawn(listener)?;
        let addr = server.local_addr();
        self.register(server);
        Ok(addr)
    }

    /// Register any server to be stopped by the drain sequence.
    pub fn register(&self, server: Arc<dyn TrackedServer>) {
        if self.inner.triggered.load(Ordering::Acquire) {
            tracing::warn!(
                kind = %server.kind(),
                "Server registered after shutdown started, it will not be drained"
            );
        }
        tracing::info!(kind = %server.kind(), address = ?server.local_addr(), "Server wrapped");
        self.inner.registry.register(server);
    }

    // ---------------------------------------------------------------------
    // Triggers
    // ---------------------------------------------------------------------

    /// Start the drain sequence in the background without waiting for it.
    ///
    /// Readiness is false by the time this returns. Returns `true` only for
    /// the call that actually started the sequence. Must be called within a
    /// Tokio runtime.
    pub fn trigger(&self) -> bool {
        if self
            .inner
            .triggered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        let started = Instant::now();
        tracing::info!(in_flight = self.in_flight(), "Starting graceful shutdown");

        self.inner.readiness.mark_draining();
        if let Some(metrics) = &self.inner.metrics {
            metrics.set_ready(false);
        }
        tracing::info!("Readiness set to false");

        self.inner.phase.send_replace(Phase::Draining);

        // A panicking drain still ends in `Stopped`.
        let this = self.clone();
        tokio::spawn(async move {
            let drain = tokio::spawn({
                let this = this.clone();
                async move { this.drain(started).await }
            });

            let report = match drain.await {
                Ok(report) => report,
                Err(e) => {
                    tracing::error!(error = %e, "Drain sequence failed, marking shutdown complete");
                    ShutdownReport {
                        duration: started.elapsed(),
                        drained: false,
                        remaining: this.in_flight(),
                        forced_servers: 0,
                    }
                }
            };
            this.inner.phase.send_replace(Phase::Stopped(report));
        });

        true
    }

    /// Run the drain sequence (once per coordinator) and wait for it.
    pub async fn shutdown(&self) -> ShutdownReport {
        self.trigger();
        self.stopped().await
    }

    /// Wait for a completed drain without starting one.
    pub async fn stopped(&self) -> ShutdownReport {
        let mut phase = self.inner.phase.subscribe();
        let report = match phase.wait_for(Phase::is_stopped).await {
            Ok(phase) => phase.report().cloned().unwrap_or_default(),
            Err(_) => ShutdownReport::default(),
        };
        report
    }

    /// Block until SIGTERM/SIGINT, `cancel` completing, or a shutdown started
    /// elsewhere, then run the drain and return once it is complete.
    pub async fn wait<F>(&self, cancel: F) -> ShutdownReport
    where
        F: Future<Output = ()>,
    {
        let mut phase = self.inner.phase.subscribe();

        tokio::select! {
            _ = cancel => {
                tracing::info!("Cancellation requested, initiating graceful shutdown");
            }
            signal = signals::termination() => {
                tracing::info!(signal = %signal, "Received signal, initiating graceful shutdown");
            }
            _ = left_running(&mut phase) => {
                tracing::debug!("Shutdown already in progress");
            }
        }

        self.shutdown().await
    }

    /// [`wait`](Self::wait) with OS signals as the only external trigger.
    pub async fn wait_for_signal(&self) -> ShutdownReport {
        self.wait(std::future::pending()).await
    }

    // ---------------------------------------------------------------------
    // Drain sequence
    // ---------------------------------------------------------------------

    async fn drain(&self, started: Instant) -> ShutdownReport {
        let config = &self.inner.config;

        if !config.load_balancer_delay.is_zero() {
            tracing::info!(
                delay = ?config.load_balancer_delay,
                "Waiting for load balancers to observe readiness change"
            );
            tokio::time::sleep(config.load_balancer_delay).await;
        }

        let deadline = deadline_after(Instant::now(), config.drain_timeout);
        let forced_servers = self.stop_servers(deadline).await;

        tracing::info!(in_flight = self.in_flight(), "Waiting for in-flight requests to complete");
        let counter = Arc::clone(&self.inner.inflight);
        let wait_deadline = deadline.into_std();
        let drained =
            match tokio::task::spawn_blocking(move || counter.wait_for_drain(wait_deadline)).await {
                Ok(drained) => drained,
                Err(e) => {
                    tracing::error!(error = %e, "In-flight wait failed");
                    false
                }
            };

        let remaining = self.in_flight();
        if drained {
            tracing::info!("All in-flight requests completed");
        } else {
            tracing::warn!(remaining, "Timed out waiting for in-flight requests");
        }

        if !config.hard_stop_timeout.is_zero() {
            tracing::info!(timeout = ?config.hard_stop_timeout, "Waiting out hard stop timeout");
            tokio::time::sleep(config.hard_stop_timeout).await;
        }

        let duration = started.elapsed();
        if let Some(metrics) = &self.inner.metrics {
            metrics.record_shutdown(duration);
        }
        tracing::info!(duration = ?duration, drained, forced_servers, "Graceful shutdown completed");

        ShutdownReport {
            duration,
            drained,
            remaining,
            forced_servers,
        }
    }

    /// Stop every registered server concurrently. Returns how many had to be
    /// forced.
    async fn stop_servers(&self, deadline: Instant) -> usize {
        let servers = self.inner.registry.snapshot();
        if servers.is_empty() {
            return 0;
        }

        tracing::info!(servers = servers.len(), "Stopping servers");
        let forced = join_all(
            servers
                .iter()
                .map(|server| stop_server(server.as_ref(), deadline)),
        )
        .await;

        forced.into_iter().filter(|forced| *forced).count()
    }
}

async fn stop_server(server: &dyn TrackedServer, deadline: Instant) -> bool {
    let kind = server.kind();
    let address = server.local_addr();

    match server.stop_accepting(deadline).await {
        Ok(()) => {
            tracing::info!(kind = %kind, address = ?address, "Server stopped");
            false
        }
        Err(StopError::DeadlineExceeded) if kind == ServerKind::Stream => {
            tracing::warn!(address = ?address, "Stream server missed the drain deadline, forcing stop");
            server.force_stop();
            true
        }
        Err(e) => {
            tracing::warn!(kind = %kind, address = ?address, error = %e, "Server shutdown error");
            false
        }
    }
}

/// `now + timeout`, saturating to a far-future instant for timeouts too
/// large to represent.
fn deadline_after(now: Instant, timeout: Duration) -> Instant {
    now.checked_add(timeout)
        .unwrap_or_else(|| now + FAR_FUTURE)
}

/// Roughly 30 years; the same horizon tokio uses for unbounded sleeps.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

async fn left_running(phase: &mut watch::Receiver<Phase>) {
    let _ = phase.wait_for(|phase| *phase != Phase::Running).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    /// Server that takes `busy_for` to stop, or misses the deadline trying.
    #[derive(Debug)]
    struct ScriptedServer {
        kind: ServerKind,
        busy_for: Duration,
        stops: AtomicUsize,
        forced: AtomicBool,
    }

    impl ScriptedServer {
        fn new(kind: ServerKind, busy_for: Duration) -> Arc<Self> {
            Arc::new(Self {
                kind,
                busy_for,
                stops: AtomicUsize::new(0),
                forced: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl TrackedServer for ScriptedServer {
        fn kind(&self) -> ServerKind {
            self.kind
        }

        fn local_addr(&self) -> Option<SocketAddr> {
            None
        }

        async fn stop_accepting(&self, deadline: Instant) -> Result<(), StopError> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            let done = Instant::now() + self.busy_for;
            if done > deadline {
                tokio::time::sleep_until(deadline).await;
                return Err(StopError::DeadlineExceeded);
            }
            tokio::time::sleep_until(done).await;
            Ok(())
        }

        fn force_stop(&self) {
            self.forced.store(true, Ordering::SeqCst);
        }
    }

    /// Server whose stop attempt panics.
    #[derive(Debug)]
    struct PanickingServer;

    #[async_trait]
    impl TrackedServer for PanickingServer {
        fn kind(&self) -> ServerKind {
            ServerKind::Http
        }

        fn local_addr(&self) -> Option<SocketAddr> {
            None
        }

        async fn stop_accepting(&self, _deadline: Instant) -> Result<(), StopError> {
            panic!("stop failed");
        }

        fn force_stop(&self) {}
    }

    fn quick_config(drain_timeout: Duration) -> GracefulConfig {
        GracefulConfig {
            drain_timeout,
            ..GracefulConfig::immediate()
        }
    }

    #[tokio::test]
    async fn concurrent_shutdowns_run_once() {
        let graceful = Graceful::new(quick_config(Duration::from_secs(1)));
        let server = ScriptedServer::new(ServerKind::Http, Duration::from_millis(20));
        graceful.register(server.clone());

        let callers: Vec<_> = (0..10)
            .map(|_| {
                let graceful = graceful.clone();
                tokio::spawn(async move { graceful.shutdown().await })
            })
            .collect();

        let mut reports = Vec::new();
        for caller in callers {
            reports.push(caller.await.unwrap());
        }

        assert_eq!(server.stops.load(Ordering::SeqCst), 1);
        assert!(reports.windows(2).all(|pair| pair[0] == pair[1]));

        let text = graceful.metrics().unwrap().render();
        assert!(text.contains("gracewrap_shutdowns_total 1"), "{text}");
        assert!(text.contains("gracewrap_shutdown_duration_seconds_count 1"), "{text}");
    }

    #[tokio::test]
    async fn phases_progress_to_stopped() {
        let graceful = Graceful::new(GracefulConfig {
            load_balancer_delay: Duration::from_millis(50),
            ..GracefulConfig::immediate()
        });
        assert_eq!(graceful.phase(), Phase::Running);
        assert!(graceful.is_ready());

        assert!(graceful.trigger());
        assert!(!graceful.trigger());
        assert_eq!(graceful.phase(), Phase::Draining);
        assert!(!graceful.is_ready());

        let report = graceful.stopped().await;
        assert!(report.drained);
        assert!(report.duration >= Duration::from_millis(50));
        assert_eq!(graceful.phase(), Phase::Stopped(report));
        assert!(!graceful.is_ready());
    }

    #[tokio::test]
    async fn waits_for_tracked_work() {
        let graceful = Graceful::new(quick_config(Duration::from_secs(2)));
        let guard = graceful.track();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            drop(guard);
        });

        let report = graceful.shutdown().await;
        assert!(report.drained);
        assert_eq!(report.remaining, 0);
        assert!(report.duration >= Duration::from_millis(25));
        assert!(report.duration < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn gives_up_at_drain_deadline() {
        let graceful = Graceful::new(quick_config(Duration::from_millis(50)));
        let _guard = graceful.track();

        let report = graceful.shutdown().await;
        assert!(!report.drained);
        assert_eq!(report.remaining, 1);
        assert!(report.duration < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn only_stream_servers_are_forced() {
        let graceful = Graceful::new(quick_config(Duration::from_millis(50)));
        let http = ScriptedServer::new(ServerKind::Http, Duration::from_secs(10));
        let stream = ScriptedServer::new(ServerKind::Stream, Duration::from_secs(10));
        graceful.register(http.clone());
        graceful.register(stream.clone());

        let report = graceful.shutdown().await;

        assert_eq!(report.forced_servers, 1);
        assert!(stream.forced.load(Ordering::SeqCst));
        assert!(!http.forced.load(Ordering::SeqCst));
        assert!(report.duration < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn server_stop_and_in_flight_wait_share_one_deadline() {
        let graceful = Graceful::new(quick_config(Duration::from_millis(200)));
        let stuck = ScriptedServer::new(ServerKind::Http, Duration::from_secs(10));
        graceful.register(stuck.clone());
        let _guard = graceful.track();

        let report = graceful.shutdown().await;

        assert!(!report.drained);
        assert_eq!(report.remaining, 1);
        assert!(report.duration >= Duration::from_millis(200), "{report:?}");
        assert!(report.duration < Duration::from_millis(300), "{report:?}");
    }

    #[tokio::test]
    async fn unbounded_drain_timeout_still_completes() {
        let graceful = Graceful::new(quick_config(Duration::MAX));
        graceful.register(ScriptedServer::new(ServerKind::Http, Duration::from_millis(10)));

        let report = tokio::time::timeout(Duration::from_secs(3), graceful.shutdown())
            .await
            .unwrap();
        assert!(report.drained);
        assert!(graceful.phase().is_stopped());
    }

    #[test]
    fn deadline_saturates_instead_of_overflowing() {
        let now = Instant::now();
        assert_eq!(deadline_after(now, Duration::from_secs(1)), now + Duration::from_secs(1));
        assert_eq!(deadline_after(now, Duration::MAX), now + FAR_FUTURE);
    }

    #[tokio::test]
    async fn panicking_drain_still_stops() {
        let graceful = Graceful::new(quick_config(Duration::from_secs(1)));
        graceful.register(Arc::new(PanickingServer));
        let _guard = graceful.track();

        let report = tokio::time::timeout(Duration::from_secs(3), graceful.shutdown())
            .await
            .unwrap();

        assert!(!report.drained);
        assert_eq!(report.remaining, 1);
        assert_eq!(graceful.phase(), Phase::Stopped(report));
        assert!(!graceful.is_ready());
    }

    #[tokio::test]
    async fn servers_stop_concurrently() {
        let graceful = Graceful::new(quick_config(Duration::from_secs(2)));
        for _ in 0..4 {
            graceful.register(ScriptedServer::new(ServerKind::Http, Duration::from_millis(100)));
        }

        let report = graceful.shutdown().await;
        assert!(report.duration < Duration::from_millis(350));
    }

    #[tokio::test]
    async fn hard_stop_delay_applies() {
        let graceful = Graceful::new(GracefulConfig {
            hard_stop_timeout: Duration::from_millis(60),
            ..GracefulConfig::immediate()
        });

        let report = graceful.shutdown().await;
        assert!(report.duration >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn wait_returns_on_cancel() {
        let graceful = Graceful::new(GracefulConfig::immediate());
        let report = graceful.wait(async {}).await;

        assert!(report.drained);
        assert!(graceful.phase().is_stopped());
    }

    #[tokio::test]
    async fn wait_joins_explicit_shutdown() {
        let graceful = Graceful::new(GracefulConfig::immediate());
        let waiter = {
            let graceful = graceful.clone();
            tokio::spawn(async move { graceful.wait(std::future::pending()).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        let report = graceful.shutdown().await;

        let waited = tokio::time::timeout(Duration::from_secs(2), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(waited, report);
    }

    #[tokio::test]
    async fn readiness_gauge_drops_on_trigger() {
        let graceful = Graceful::new(GracefulConfig::immediate());
        graceful.shutdown().await;

        let text = graceful.metrics().unwrap().render();
        assert!(text.contains("gracewrap_readiness_status 0"), "{text}");
    }

    #[tokio::test]
    async fn metrics_disabled() {
        let graceful = Graceful::new(GracefulConfig {
            enable_metrics: false,
            ..GracefulConfig::immediate()
        });
        assert!(graceful.metrics().is_none());
        assert_eq!(graceful.metrics_probe().status, axum::http::StatusCode::NOT_FOUND);
    }
}

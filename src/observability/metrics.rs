//! Prometheus metrics for the graceful coordinator.
//!
//! # Metrics
//!
//! | Metric | Type | Description |
//! |--------|------|-------------|
//! | `gracewrap_inflight_requests` | Gauge | Requests and streams currently in flight |
//! | `gracewrap_http_requests_total` | Counter | HTTP requests accepted |
//! | `gracewrap_stream_requests_total` | Counter | Persistent streams accepted |
//! | `gracewrap_shutdown_duration_seconds` | Histogram | Time taken by the drain sequence |
//! | `gracewrap_readiness_status` | Gauge | 1 while ready, 0 once draining |
//! | `gracewrap_shutdowns_total` | Counter | Completed drain sequences |
//!
//! # Design Decisions
//! - Every coordinator owns its recorder; nothing is installed globally, so
//!   two coordinators in one process never share series
//! - Handles are resolved once at construction; updates are atomic stores

use metrics::{describe_counter, describe_gauge, describe_histogram, Counter, Gauge, Histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

use crate::lifecycle::registry::ServerKind;

pub const INFLIGHT_REQUESTS: &str = "gracewrap_inflight_requests";
pub const HTTP_REQUESTS_TOTAL: &str = "gracewrap_http_requests_total";
pub const STREAM_REQUESTS_TOTAL: &str = "gracewrap_stream_requests_total";
pub const SHUTDOWN_DURATION_SECONDS: &str = "gracewrap_shutdown_duration_seconds";
pub const READINESS_STATUS: &str = "gracewrap_readiness_status";
pub const SHUTDOWNS_TOTAL: &str = "gracewrap_shutdowns_total";

/// Prometheus client default buckets.
const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Metric handles bound to a private Prometheus recorder.
pub struct Metrics {
    handle: PrometheusHandle,
    inflight: Gauge,
    http_requests: Counter,
    stream_requests: Counter,
    shutdown_duration: Histogram,
    readiness: Gauge,
    shutdowns: Counter,
}

impl Metrics {
    /// Build a recorder and register every gracewrap series on it.
    ///
    /// The readiness gauge starts at 1.
    pub fn new() -> Result<Self, BuildError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(SHUTDOWN_DURATION_SECONDS.to_string()),
                &DEFAULT_BUCKETS,
            )?
            .build_recorder();
        let handle = recorder.handle();

        let metrics = metrics::with_local_recorder(&recorder, || {
            describe_gauge!(INFLIGHT_REQUESTS, "Number of in-flight requests");
            describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests");
            describe_counter!(STREAM_REQUESTS_TOTAL, "Total number of persistent streams");
            describe_histogram!(
                SHUTDOWN_DURATION_SECONDS,
                "Time taken for graceful shutdown"
            );
            describe_gauge!(READINESS_STATUS, "Readiness status (1 = ready, 0 = not ready)");
            describe_counter!(SHUTDOWNS_TOTAL, "Total number of graceful shutdowns");

            Self {
                handle,
                inflight: metrics::gauge!(INFLIGHT_REQUESTS),
                http_requests: metrics::counter!(HTTP_REQUESTS_TOTAL),
                stream_requests: metrics::counter!(STREAM_REQUESTS_TOTAL),
                shutdown_duration: metrics::histogram!(SHUTDOWN_DURATION_SECONDS),
                readiness: metrics::gauge!(READINESS_STATUS),
                shutdowns: metrics::counter!(SHUTDOWNS_TOTAL),
            }
        });

        metrics.readiness.set(1.0);
        Ok(metrics)
    }

    pub fn set_in_flight(&self, count: u64) {
        self.inflight.set(count as f64);
    }

    /// Count one accepted request (HTTP) or stream.
    pub fn record_request(&self, kind: ServerKind) {
        match kind {
            ServerKind::Http => self.http_requests.increment(1),
            ServerKind::Stream => self.stream_requests.increment(1),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.readiness.set(if ready { 1.0 } else { 0.0 });
    }

    /// Record a completed drain sequence.
    pub fn record_shutdown(&self, duration: Duration) {
        self.shutdown_duration.record(duration.as_secs_f64());
        self.shutdowns.increment(1);
    }

    /// Render all series in the Prometheus text exposition format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}

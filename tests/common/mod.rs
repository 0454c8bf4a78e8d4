//! Shared helpers for integration tests.

#![allow(dead_code)]

use axum::{routing::get, Router};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

use gracewrap::GracefulConfig;

/// No delays, metrics on, the given drain budget.
pub fn config(drain_timeout: Duration) -> GracefulConfig {
    GracefulConfig {
        drain_timeout,
        ..GracefulConfig::immediate()
    }
}

/// Observes a slow handler from the test body.
#[derive(Clone, Default)]
pub struct Probe {
    pub started: Arc<Notify>,
    pub completed: Arc<AtomicUsize>,
}

impl Probe {
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

/// Router with `/slow` taking `delay` and `/ok` answering immediately.
pub fn slow_router(delay: Duration) -> (Router, Probe) {
    let probe = Probe::default();
    let handler_probe = probe.clone();

    let router = Router::new()
        .route(
            "/slow",
            get(move || {
                let probe = handler_probe.clone();
                async move {
                    probe.started.notify_one();
                    tokio::time::sleep(delay).await;
                    probe.completed.fetch_add(1, Ordering::SeqCst);
                    "done"
                }
            }),
        )
        .route("/ok", get(|| async { "ok" }));

    (router, probe)
}

/// Poll `condition` until it holds or `timeout` passes.
pub async fn eventually<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}

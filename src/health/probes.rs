//! Readiness, liveness and metrics probes.
//!
//! # Responsibilities
//! - Map coordinator state to a status code and plain-text body
//! - Serve those responses on `/health/ready`, `/health/live` and `/metrics`
//!
//! The [`ProbeResponse`] values are transport-agnostic; the axum routes are
//! one way of serving them.
//!
//! | Route           | Condition        | Status | Body                  |
//! |-----------------|------------------|--------|-----------------------|
//! | `/health/ready` | ready            | 200    | `ready`               |
//! | `/health/ready` | draining         | 503    | `draining`            |
//! | `/health/live`  | always           | 200    | `alive`               |
//! | `/metrics`      | metrics disabled | 404    | `metrics not enabled` |
//! | `/metrics`      | metrics enabled  | 200    | Prometheus text       |

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::health::readiness::ReadinessFlag;
use crate::lifecycle::Graceful;
use crate::observability::Metrics;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const PROMETHEUS_TEXT: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Status, content type and body of a probe answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl ProbeResponse {
    fn text(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            content_type: TEXT_PLAIN,
            body: format!("{body}\n"),
        }
    }
}

impl IntoResponse for ProbeResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body,
        )
            .into_response()
    }
}

pub fn readiness(flag: &ReadinessFlag) -> ProbeResponse {
    if flag.is_ready() {
        ProbeResponse::text(StatusCode::OK, "ready")
    } else {
        ProbeResponse::text(StatusCode::SERVICE_UNAVAILABLE, "draining")
    }
}

/// The process is alive for as long as it can answer.
pub fn liveness() -> ProbeResponse {
    ProbeResponse::text(StatusCode::OK, "alive")
}

pub fn metrics(metrics: Option<&Metrics>) -> ProbeResponse {
    match metrics {
        Some(metrics) => ProbeResponse {
            status: StatusCode::OK,
            content_type: PROMETHEUS_TEXT,
            body: metrics.render(),
        },
        None => ProbeResponse::text(StatusCode::NOT_FOUND, "metrics not enabled"),
    }
}

/// Router serving the three probe endpoints for `graceful`.
pub fn routes(graceful: Graceful) -> Router {
    Router::new()
        .route("/health/ready", get(ready_handler))
        .route("/health/live", get(live_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(graceful)
}

async fn ready_handler(State(graceful): State<Graceful>) -> ProbeResponse {
    graceful.readiness_probe()
}

async fn live_handler() -> ProbeResponse {
    liveness()
}

async fn metrics_handler(State(graceful): State<Graceful>) -> ProbeResponse {
    graceful.metrics_probe()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GracefulConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn get_probe(router: Router, path: &str) -> (StatusCode, String) {
        let response = router
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn readiness_follows_flag() {
        let flag = ReadinessFlag::new();
        assert_eq!(readiness(&flag).status, StatusCode::OK);
        assert_eq!(readiness(&flag).body, "ready\n");

        flag.mark_draining();
        assert_eq!(readiness(&flag).status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(readiness(&flag).body, "draining\n");
    }

    #[test]
    fn metrics_disabled_is_not_found() {
        let response = metrics(None);
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert!(response.body.contains("metrics not enabled"));
    }

    #[tokio::test]
    async fn routes_report_draining_after_trigger() {
        let graceful = Graceful::new(GracefulConfig {
            load_balancer_delay: std::time::Duration::from_millis(200),
            ..GracefulConfig::immediate()
        });
        let router = routes(graceful.clone());

        let (status, body) = get_probe(router.clone(), "/health/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ready\n");

        graceful.trigger();

        let (status, body) = get_probe(router.clone(), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, "draining\n");

        let (status, body) = get_probe(router, "/health/live").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "alive\n");
    }

    #[tokio::test]
    async fn metrics_route_renders_prometheus_text() {
        let graceful = Graceful::new(GracefulConfig::immediate());
        let (status, body) = get_probe(routes(graceful), "/metrics").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("gracewrap_readiness_status"), "{body}");
    }

    #[tokio::test]
    async fn metrics_route_without_metrics() {
        let graceful = Graceful::new(GracefulConfig {
            enable_metrics: false,
            ..GracefulConfig::immediate()
        });
        let (status, _) = get_probe(routes(graceful), "/metrics").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

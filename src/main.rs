//! gracewrap demo service.
//!
//! Serves an HTTP API and a WebSocket echo stream under one [`Graceful`]
//! coordinator, then waits for SIGTERM/SIGINT and drains.
//!
//! ```text
//! :8080  /api/status       immediate JSON
//!        /api/test         500 ms of "work"
//!        /api/database     2 s simulated query
//!        /slow             5 s, for watching a drain
//!        /health/ready     200 ready / 503 draining
//!        /health/live      200 alive
//!        /metrics          Prometheus text (if enabled)
//! :9090  ws://             echo stream
//! ```
//!
//! Timings come from defaults, an optional TOML file, then the
//! `DRAIN_TIMEOUT_SECONDS`, `HARD_STOP_TIMEOUT_SECONDS`,
//! `LOAD_BALANCER_DELAY_SECONDS` and `ENABLE_METRICS` environment variables.

use axum::{routing::get, Json, Router};
use clap::Parser;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use gracewrap::config::{load_config, GracefulConfig};
use gracewrap::observability::logging::init_logging;
use gracewrap::{Graceful, ServerStream};

#[derive(Parser, Debug)]
#[command(name = "gracewrap")]
#[command(about = "Demo service with graceful shutdown", long_about = None)]
struct Cli {
    /// HTTP API listen address
    #[arg(long, default_value = "0.0.0.0:8080")]
    http_addr: String,

    /// WebSocket stream listen address
    #[arg(long, default_value = "0.0.0.0:9090")]
    stream_addr: String,

    /// Optional TOML config file (environment variables override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Force metrics on regardless of config
    #[arg(long)]
    metrics: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging("gracewrap=debug,tower_http=info");

    let cli = Cli::parse();

    let base = match &cli.config {
        Some(path) => load_config(path)?,
        None => GracefulConfig::default(),
    };
    let mut config = base.with_env_overrides(|key| std::env::var(key).ok());
    config.enable_metrics |= cli.metrics;

    tracing::info!(
        http_addr = %cli.http_addr,
        stream_addr = %cli.stream_addr,
        "gracewrap demo v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let graceful = Graceful::new(config);

    let api = Router::new()
        .route("/api/status", get(status))
        .route("/api/test", get(test))
        .route("/api/database", get(database))
        .route("/slow", get(slow))
        .merge(graceful.health_routes())
        .layer(TraceLayer::new_for_http());

    let http_addr = graceful.wrap_http(api, &cli.http_addr).await?;
    let stream_addr = graceful.serve_stream(&cli.stream_addr, echo).await?;

    tracing::info!(%http_addr, %stream_addr, "Service ready, send SIGTERM or press Ctrl+C to drain");

    let report = graceful.wait_for_signal().await;

    tracing::info!(
        duration = ?report.duration,
        drained = report.drained,
        remaining = report.remaining,
        forced_servers = report.forced_servers,
        "Shutdown complete"
    );
    Ok(())
}

async fn status() -> Json<Value> {
    Json(json!({
        "status": "running",
        "service": "gracewrap-demo",
    }))
}

async fn test() -> &'static str {
    tokio::time::sleep(Duration::from_millis(500)).await;
    "Test request completed\n"
}

async fn database() -> &'static str {
    tokio::time::sleep(Duration::from_secs(2)).await;
    "Database query completed\n"
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(5)).await;
    "Slow request completed\n"
}

async fn echo(mut stream: ServerStream) {
    let peer_addr = stream.peer_addr();
    tracing::debug!(%peer_addr, "Stream opened");

    while let Some(message) = stream.next().await {
        match message {
            Ok(message) if message.is_close() => break,
            Ok(message) if message.is_text() || message.is_binary() => {
                if let Err(e) = stream.send(message).await {
                    tracing::debug!(%peer_addr, error = %e, "Echo failed");
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(%peer_addr, error = %e, "Stream error");
                break;
            }
        }
    }

    tracing::debug!(%peer_addr, "Stream closed");
}

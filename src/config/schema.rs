//! Configuration schema definitions.
//!
//! Durations are written as whole or fractional seconds in config files
//! (`drain_timeout_secs = 25`) and held as [`Duration`] in memory. A zero
//! duration means "skip this phase's wait".

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and feature switches for a graceful coordinator.
///
/// The coordinator takes a snapshot of this at construction; changing a
/// config afterwards has no effect on a running coordinator.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GracefulConfig {
    /// Shared budget for servers to stop accepting and in-flight work to finish.
    #[serde(rename = "drain_timeout_secs", with = "secs")]
    pub drain_timeout: Duration,

    /// Final grace period after the drain, before shutdown is reported complete.
    #[serde(rename = "hard_stop_timeout_secs", with = "secs")]
    pub hard_stop_timeout: Duration,

    /// Time given to load balancers to notice the readiness change.
    #[serde(rename = "load_balancer_delay_secs", with = "secs")]
    pub load_balancer_delay: Duration,

    /// Collect and expose Prometheus metrics.
    pub enable_metrics: bool,
}

impl Default for GracefulConfig {
    fn default() -> Self {
        Self {
            drain_timeout: Duration::from_secs(25),
            hard_stop_timeout: Duration::from_secs(5),
            load_balancer_delay: Duration::from_secs(1),
            enable_metrics: false,
        }
    }
}

impl GracefulConfig {
    /// Config with every wait disabled and metrics on. Handy for tests and
    /// for callers that drive the timing themselves.
    pub fn immediate() -> Self {
        Self {
            drain_timeout: Duration::ZERO,
            hard_stop_timeout: Duration::ZERO,
            load_balancer_delay: Duration::ZERO,
            enable_metrics: true,
        }
    }
}

mod secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

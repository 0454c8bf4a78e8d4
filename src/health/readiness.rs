//! Process readiness flag.
//!
//! # States
//! ```text
//! Ready ──(shutdown triggered)──▶ Draining
//! ```
//! There is no way back: once draining, the process stays not-ready until it
//! exits. Reads are lock-free so probes never contend with the drain.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared, cheaply cloneable readiness flag. Starts ready.
#[derive(Debug, Clone)]
pub struct ReadinessFlag {
    ready: Arc<AtomicBool>,
}

impl ReadinessFlag {
    pub fn new() -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Flip to not-ready. Returns `true` if this call made the transition.
    pub(crate) fn mark_draining(&self) -> bool {
        self.ready.swap(false, Ordering::AcqRel)
    }
}

impl Default for ReadinessFlag {
    fn default() -> Self {
        Self::new()
    }
}

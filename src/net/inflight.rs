//! In-flight operation accounting.
//!
//! # Responsibilities
//! - Count requests and streams between acceptance and completion
//! - Release each count exactly once through a drop guard
//! - Let the shutdown path block until the count reaches zero or a deadline
//!
//! # Design Decisions
//! - Mutex + condvar rather than an atomic: the drain waiter must not miss the
//!   transition to zero, so the broadcast happens under the same lock as the
//!   decrement
//! - Waits are bounded by an absolute deadline, so spurious wake-ups never
//!   extend the total wait

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::Instant;

use crate::observability::Metrics;

/// Shared count of in-flight operations.
#[derive(Debug, Default)]
pub struct InFlightCounter {
    count: Mutex<u64>,
    drained: Condvar,
    metrics: Option<Arc<Metrics>>,
}

impl InFlightCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter that mirrors its value into the in-flight gauge.
    pub fn with_metrics(metrics: Option<Arc<Metrics>>) -> Self {
        Self {
            metrics,
            ..Self::default()
        }
    }

    /// Record the start of an operation.
    ///
    /// Prefer [`InFlightCounter::track`], which cannot forget the matching
    /// [`end`](InFlightCounter::end).
    pub fn begin(&self) {
        let mut count = self.count.lock();
        *count += 1;
        if let Some(metrics) = &self.metrics {
            metrics.set_in_flight(*count);
        }
    }

    /// Record the completion of an operation started with `begin`.
    pub fn end(&self) {
        let mut count = self.count.lock();
        debug_assert!(*count > 0, "in-flight end without a matching begin");
        *count = count.saturating_sub(1);
        if let Some(metrics) = &self.metrics {
            metrics.set_in_flight(*count);
        }
        if *count == 0 {
            self.drained.notify_all();
        }
    }

    /// Begin an operation and return a guard that ends it on drop.
    pub fn track(self: &Arc<Self>) -> InFlightGuard {
        self.begin();
        InFlightGuard {
            counter: Arc::clone(self),
        }
    }

    pub fn count(&self) -> u64 {
        *self.count.lock()
    }

    /// Block the current thread until the count is zero or `deadline` passes.
    ///
    /// Returns `true` if the count reached zero. A deadline already in the past
    /// returns immediately with whatever the current state is.
    pub fn wait_for_drain(&self, deadline: Instant) -> bool {
        let mut count = self.count.lock();
        while *count > 0 {
            if Instant::now() >= deadline {
                return false;
            }
            self.drained.wait_until(&mut count, deadline);
        }
        true
    }
}

/// Guard for one in-flight operation. Ends the operation when dropped,
/// whether the work completed, failed, panicked or was cancelled.
#[derive(Debug)]
#[must_use = "dropping the guard ends the in-flight operation immediately"]
pub struct InFlightGuard {
    counter: Arc<InFlightCounter>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.counter.end();
    }
}

//! Dispatch statistics
//!
//! Cheap atomic counters recording what the dispatcher did. Read them
//! through [`Pipeline::stats`](crate::core::pipeline::Pipeline::stats);
//! `clone()` takes a point-in-time snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct DispatchStats {
    events_dispatched: AtomicU64,
    events_suppressed: AtomicU64,
    sink_attempts: AtomicU64,
    sink_failures: AtomicU64,
    fallback_deliveries: AtomicU64,
    fallback_failures: AtomicU64,
    callback_panics: AtomicU64,
}

impl DispatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_dispatched(&self) {
        self.events_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_suppressed(&self) {
        self.events_suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_sink_attempt(&self) {
        self.sink_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_sink_failure(&self) {
        self.sink_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fallback_delivery(&self) {
        self.fallback_deliveries.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fallback_failure(&self) {
        self.fallback_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_callback_panic(&self) {
        self.callback_panics.fetch_add(1, Ordering::Relaxed);
    }

    /// Events that passed the level gate and were fanned out.
    pub fn events_dispatched(&self) -> u64 {
        self.events_dispatched.load(Ordering::Relaxed)
    }

    /// Calls rejected by the level gate before any event was built.
    pub fn events_suppressed(&self) -> u64 {
        self.events_suppressed.load(Ordering::Relaxed)
    }

    /// Individual sink emit attempts (one per sink per dispatched event).
    pub fn sink_attempts(&self) -> u64 {
        self.sink_attempts.load(Ordering::Relaxed)
    }

    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    pub fn fallback_deliveries(&self) -> u64 {
        self.fallback_deliveries.load(Ordering::Relaxed)
    }

    pub fn fallback_failures(&self) -> u64 {
        self.fallback_failures.load(Ordering::Relaxed)
    }

    pub fn callback_panics(&self) -> u64 {
        self.callback_panics.load(Ordering::Relaxed)
    }

    /// Percentage of sink attempts that failed.
    pub fn failure_rate(&self) -> f64 {
        let attempts = self.sink_attempts();
        if attempts == 0 {
            return 0.0;
        }
        (self.sink_failures() as f64 / attempts as f64) * 100.0
    }

    pub fn reset(&self) {
        self.events_dispatched.store(0, Ordering::Relaxed);
        self.events_suppressed.store(0, Ordering::Relaxed);
        self.sink_attempts.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.fallback_deliveries.store(0, Ordering::Relaxed);
        self.fallback_failures.store(0, Ordering::Relaxed);
        self.callback_panics.store(0, Ordering::Relaxed);
    }
}

impl Clone for DispatchStats {
    fn clone(&self) -> Self {
        Self {
            events_dispatched: AtomicU64::new(self.events_dispatched()),
            events_suppressed: AtomicU64::new(self.events_suppressed()),
            sink_attempts: AtomicU64::new(self.sink_attempts()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            fallback_deliveries: AtomicU64::new(self.fallback_deliveries()),
            fallback_failures: AtomicU64::new(self.fallback_failures()),
            callback_panics: AtomicU64::new(self.callback_panics()),
        }
    }
}

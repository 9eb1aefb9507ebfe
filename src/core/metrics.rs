//! Dispatch metrics for observability
//!
//! Counters for threshold filtering, per-sink delivery outcomes and the
//! detached delivery queue.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use fanout_logger::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
///
/// metrics.record_accepted();
/// metrics.record_failed();
///
/// assert_eq!(metrics.accepted(), 1);
/// assert_eq!(metrics.failed(), 1);
/// ```
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Events that passed the threshold
    accepted: AtomicU64,

    /// Events rejected by the threshold
    filtered: AtomicU64,

    /// Successful sink deliveries
    delivered: AtomicU64,

    /// Failed sink deliveries (errors and panics)
    failed: AtomicU64,

    /// Remote records diverted to the local error stream by environment policy
    diverted: AtomicU64,

    /// Deliveries handed to the detached queue
    detached_queued: AtomicU64,

    /// Deliveries dropped because the detached queue was full or stopped
    detached_dropped: AtomicU64,

    /// Number of times the detached queue was found full
    queue_full_events: AtomicU64,

    /// Number of times a caller blocked waiting for queue space
    block_events: AtomicU64,
}

impl DispatchMetrics {
    pub const fn new() -> Self {
        Self {
            accepted: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            diverted: AtomicU64::new(0),
            detached_queued: AtomicU64::new(0),
            detached_dropped: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
            block_events: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn diverted(&self) -> u64 {
        self.diverted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn detached_queued(&self) -> u64 {
        self.detached_queued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn detached_dropped(&self) -> u64 {
        self.detached_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn block_events(&self) -> u64 {
        self.block_events.load(Ordering::Relaxed)
    }

    /// Each `record_*` returns the previous value
    #[inline]
    pub fn record_accepted(&self) -> u64 {
        self.accepted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_diverted(&self) -> u64 {
        self.diverted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_detached_queued(&self) -> u64 {
        self.detached_queued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_detached_dropped(&self) -> u64 {
        self.detached_dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_block(&self) -> u64 {
        self.block_events.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed deliveries as a percentage of all attempted deliveries
    ///
    /// Returns 0.0 if nothing has been delivered yet.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed() as f64;
        let total = self.delivered() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.accepted,
            &self.filtered,
            &self.delivered,
            &self.failed,
            &self.diverted,
            &self.detached_queued,
            &self.detached_dropped,
            &self.queue_full_events,
            &self.block_events,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

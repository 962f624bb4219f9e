//! Delivery counters for engines
//!
//! Every consumer keeps one of these so callers can observe drops from queue
//! overflow and failing sinks without the logging path ever returning an
//! error.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing what a consumer did with the records it was given
///
/// # Example
///
/// ```
/// use simplelog::EngineMetrics;
///
/// let metrics = EngineMetrics::new();
/// metrics.record_delivered();
/// metrics.record_dropped();
///
/// assert_eq!(metrics.delivered_count(), 1);
/// assert_eq!(metrics.dropped_count(), 1);
/// ```
#[derive(Debug)]
pub struct EngineMetrics {
    /// Records handed to every bound sink
    delivered: AtomicU64,

    /// Records dropped because the async queue was full
    dropped: AtomicU64,

    /// Synthetic overflow lines emitted
    overflow_notices: AtomicU64,

    /// Sink calls that returned an error or panicked
    sink_failures: AtomicU64,

    /// Completed flush cycles
    flushes: AtomicU64,
}

impl EngineMetrics {
    pub const fn new() -> Self {
        Self {
            delivered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            overflow_notices: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            flushes: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn overflow_notices(&self) -> u64 {
        self.overflow_notices.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_count(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    /// Returns the previous value
    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    /// Returns the previous value
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_overflow_notice(&self) -> u64 {
        self.overflow_notices.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush(&self) -> u64 {
        self.flushes.fetch_add(1, Ordering::Relaxed)
    }

    /// Dropped records as a percentage (0.0 - 100.0) of everything consumed
    ///
    /// Returns 0.0 if nothing has been consumed yet.
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = self.delivered_count() as f64 + dropped;
        if total == 0.0 {
            0.0
        } else {
            (dropped / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.delivered.store(0, Ordering::Relaxed);
        self.dropped.store(0, Ordering::Relaxed);
        self.overflow_notices.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.flushes.store(0, Ordering::Relaxed);
    }
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for EngineMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            delivered: AtomicU64::new(self.delivered_count()),
            dropped: AtomicU64::new(self.dropped_count()),
            overflow_notices: AtomicU64::new(self.overflow_notices()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            flushes: AtomicU64::new(self.flush_count()),
        }
    }
}

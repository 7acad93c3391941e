//! Dispatch metrics
//!
//! Counters for how many log calls were accepted or filtered out and how
//! many destination writes failed.

use std::sync::atomic::{AtomicU64, Ordering};

/// # Example
///
/// ```
/// use scoped_logger::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
/// metrics.record_accepted();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.accepted(), 1);
/// assert_eq!(metrics.filtered(), 1);
/// ```
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Calls at or above the effective level
    accepted: AtomicU64,

    /// Calls below the effective level
    filtered: AtomicU64,

    /// Destination writes attempted for accepted calls
    writes_attempted: AtomicU64,

    /// Destination writes that returned an error
    write_failures: AtomicU64,
}

impl DispatchMetrics {
    pub const fn new() -> Self {
        Self {
            accepted: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            writes_attempted: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
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
    pub fn writes_attempted(&self) -> u64 {
        self.writes_attempted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_accepted(&self) -> u64 {
        self.accepted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    /// Record the outcome of one dispatch
    #[inline]
    pub fn record_writes(&self, attempted: usize, failed: usize) {
        self.writes_attempted
            .fetch_add(attempted as u64, Ordering::Relaxed);
        self.write_failures.fetch_add(failed as u64, Ordering::Relaxed);
    }

    /// Share of failed destination writes as a percentage (0.0 - 100.0)
    pub fn failure_rate(&self) -> f64 {
        let attempted = self.writes_attempted() as f64;
        if attempted == 0.0 {
            0.0
        } else {
            (self.write_failures() as f64 / attempted) * 100.0
        }
    }

    pub fn reset(&self) {
        self.accepted.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.writes_attempted.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DispatchMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            accepted: AtomicU64::new(self.accepted()),
            filtered: AtomicU64::new(self.filtered()),
            writes_attempted: AtomicU64::new(self.writes_attempted()),
            write_failures: AtomicU64::new(self.write_failures()),
        }
    }
}

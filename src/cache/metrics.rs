//! Cache Metrics Module
//!
//! Counts how stats requests were served.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Metrics ==
/// Point-in-time copy of the stats cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheMetrics {
    /// Requests served from the memoized entry
    pub hits: u64,
    /// Requests that recomputed the aggregate
    pub misses: u64,
    /// Entries marked stale by a pushed change notification
    pub invalidations: u64,
    /// Requests answered with a stale entry because a refresh failed
    pub stale_served: u64,
}

impl CacheMetrics {
    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Shared counters behind [`CacheMetrics`].
#[derive(Debug, Default)]
pub(crate) struct MetricsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
    stale_served: AtomicU64,
}

impl MetricsRecorder {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_served(&self) {
        self.stale_served.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheMetrics {
        CacheMetrics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            stale_served: self.stale_served.load(Ordering::Relaxed),
        }
    }
}

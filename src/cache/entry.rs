//! Cache Entry Module
//!
//! The single memoized stats value and the signal it was computed against.

use chrono::{DateTime, Utc};

use crate::cache::StatsSnapshot;
use crate::catalog::ModSignal;

// == Cache Entry ==
/// Memoized aggregate plus the modification signal observed before computing it.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The memoized aggregate
    pub value: StatsSnapshot,
    /// Signal read before the snapshot was loaded
    pub observed: ModSignal,
    /// Cleared when an out-of-band change is pushed by the watcher
    pub valid: bool,
    /// When the value was computed
    pub computed_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(value: StatsSnapshot, observed: ModSignal) -> Self {
        Self {
            value,
            observed,
            valid: true,
            computed_at: Utc::now(),
        }
    }

    // == Is Fresh ==
    /// True if the entry may be served for a store currently at `current`.
    pub fn is_fresh(&self, current: &ModSignal) -> bool {
        self.valid && !current.has_changed_since(&self.observed)
    }

    /// Marks the entry stale while keeping its value for fallback reads.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }
}

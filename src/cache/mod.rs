//! Cache Module
//!
//! Aggregate stats over the collection and the change-aware cache in front of them.

mod entry;
mod metrics;
mod stats;
mod stats_cache;


// Re-export public types
pub use entry::CacheEntry;
pub use metrics::CacheMetrics;
pub use stats::StatsSnapshot;
pub use stats_cache::StatsCache;

//! Change-Aware Stats Cache
//!
//! Memoizes the collection aggregate and recomputes it only when the store's
//! modification signal has moved or a change notification marked it stale.
//!
//! Concurrent misses are single-flighted: one request recomputes while the
//! others wait on `refresh` and then re-check the slot.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::cache::metrics::MetricsRecorder;
use crate::cache::{CacheEntry, CacheMetrics, StatsSnapshot};
use crate::catalog::{CollectionStore, ModSignal};
use crate::error::{CatalogError, Result};

// == Stats Cache ==
#[derive(Debug)]
pub struct StatsCache {
    store: Arc<CollectionStore>,
    /// None until the first successful computation
    slot: RwLock<Option<CacheEntry>>,
    /// Held by the one request recomputing the aggregate
    refresh: Mutex<()>,
    metrics: MetricsRecorder,
}

impl StatsCache {
    // == Constructor ==
    /// Creates an empty cache over `store`.
    pub fn new(store: Arc<CollectionStore>) -> Self {
        Self {
            store,
            slot: RwLock::new(None),
            refresh: Mutex::new(()),
            metrics: MetricsRecorder::default(),
        }
    }

    // == Get ==
    /// Returns the aggregate for the current collection.
    ///
    /// If a refresh fails and an earlier value exists, the earlier value is
    /// served; otherwise the storage error is returned.
    pub async fn get(&self) -> Result<StatsSnapshot> {
        let current = match self.store.current_signal().await {
            Ok(signal) => signal,
            Err(e) => return self.fallback(e).await,
        };
        if let Some(value) = self.fresh_value(&current).await {
            return Ok(value);
        }

        let _flight = self.refresh.lock().await;

        // Another request may have refreshed while we waited
        let current = match self.store.current_signal().await {
            Ok(signal) => signal,
            Err(e) => return self.fallback(e).await,
        };
        if let Some(value) = self.fresh_value(&current).await {
            return Ok(value);
        }

        match self.recompute(current).await {
            Ok(value) => Ok(value),
            Err(e) => self.fallback(e).await,
        }
    }

    async fn fresh_value(&self, current: &ModSignal) -> Option<StatsSnapshot> {
        let slot = self.slot.read().await;
        let entry = slot.as_ref().filter(|entry| entry.is_fresh(current))?;
        self.metrics.record_hit();
        debug!("Stats cache hit (computed at {})", entry.computed_at);
        Some(entry.value)
    }

    /// Loads and aggregates, stamping the entry with `observed`.
    ///
    /// `observed` is read before loading, so a write racing with the load
    /// leaves the entry behind the store's signal and the next request
    /// recomputes again.
    async fn recompute(&self, observed: ModSignal) -> Result<StatsSnapshot> {
        self.metrics.record_miss();
        let records = self.store.load().await?;
        let value = StatsSnapshot::compute(&records);

        *self.slot.write().await = Some(CacheEntry::new(value, observed));
        debug!(
            "Stats cache recomputed: total={}, average_price={}",
            value.total, value.average_price
        );
        Ok(value)
    }

    async fn fallback(&self, err: CatalogError) -> Result<StatsSnapshot> {
        let slot = self.slot.read().await;
        match slot.as_ref() {
            Some(entry) => {
                self.metrics.record_stale_served();
                warn!("Stats refresh failed, serving last good value: {}", err);
                Ok(entry.value)
            }
            None => Err(err),
        }
    }

    // == Invalidate ==
    /// Marks the memoized entry stale so the next request recomputes.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.write().await;
        if let Some(entry) = slot.as_mut() {
            entry.invalidate();
            self.metrics.record_invalidation();
        }
    }

    /// Returns the current counters.
    pub fn metrics(&self) -> CacheMetrics {
        self.metrics.snapshot()
    }

    pub fn store(&self) -> &Arc<CollectionStore> {
        &self.store
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RecordDraft;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    const TWO_ITEMS: &str = r#"[
        {"id": 1, "name": "Test Item 1", "category": "Electronics", "price": 100},
        {"id": 2, "name": "Test Item 2", "category": "Furniture", "price": 200}
    ]"#;

    fn seeded_cache(dir: &TempDir) -> StatsCache {
        let path = dir.path().join("items.json");
        std::fs::write(&path, TWO_ITEMS).unwrap();
        StatsCache::new(Arc::new(CollectionStore::new(path)))
    }

    fn bump_mtime(path: &std::path::Path, secs: u64) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(secs))
            .unwrap();
    }

    #[tokio::test]
    async fn test_first_request_computes() {
        let dir = TempDir::new().unwrap();
        let cache = seeded_cache(&dir);

        let stats = cache.get().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.average_price, 150.0);
        assert_eq!(cache.metrics().misses, 1);
        assert_eq!(cache.metrics().hits, 0);
    }

    #[tokio::test]
    async fn test_second_request_hits() {
        let dir = TempDir::new().unwrap();
        let cache = seeded_cache(&dir);

        let first = cache.get().await.unwrap();
        let second = cache.get().await.unwrap();

        assert_eq!(first.average_price.to_bits(), second.average_price.to_bits());
        assert_eq!(first, second);
        assert_eq!(cache.metrics().misses, 1);
        assert_eq!(cache.metrics().hits, 1);
    }

    #[tokio::test]
    async fn test_append_invalidates() {
        let dir = TempDir::new().unwrap();
        let cache = seeded_cache(&dir);

        cache.get().await.unwrap();
        cache
            .store()
            .append(RecordDraft::new("Third", "Misc", 300.0))
            .await
            .unwrap();

        let stats = cache.get().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.average_price, 200.0);
        assert_eq!(cache.metrics().misses, 2);
    }

    #[tokio::test]
    async fn test_external_write_detected_lazily() {
        let dir = TempDir::new().unwrap();
        let cache = seeded_cache(&dir);
        cache.get().await.unwrap();

        let path = cache.store().path().to_path_buf();
        std::fs::write(
            &path,
            r#"[{"id": 9, "name": "Solo", "category": "One", "price": 42}]"#,
        )
        .unwrap();
        bump_mtime(&path, 5);

        let stats = cache.get().await.unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.average_price, 42.0);
    }

    #[tokio::test]
    async fn test_invalidate_forces_recompute() {
        let dir = TempDir::new().unwrap();
        let cache = seeded_cache(&dir);
        cache.get().await.unwrap();

        cache.invalidate().await;
        cache.get().await.unwrap();

        let metrics = cache.metrics();
        assert_eq!(metrics.invalidations, 1);
        assert_eq!(metrics.misses, 2);
    }

    #[tokio::test]
    async fn test_invalidate_empty_slot_is_noop() {
        let dir = TempDir::new().unwrap();
        let cache = seeded_cache(&dir);

        cache.invalidate().await;
        assert_eq!(cache.metrics().invalidations, 0);
    }

    #[tokio::test]
    async fn test_unreadable_store_without_prior_value_fails() {
        let dir = TempDir::new().unwrap();
        let cache = StatsCache::new(Arc::new(CollectionStore::new(dir.path())));

        let result = cache.get().await;
        assert!(matches!(result, Err(CatalogError::StorageUnavailable(_))));
    }

    #[tokio::test]
    async fn test_corrupt_store_serves_last_good_value() {
        let dir = TempDir::new().unwrap();
        let cache = seeded_cache(&dir);
        let good = cache.get().await.unwrap();

        let path = cache.store().path().to_path_buf();
        std::fs::write(&path, "not json").unwrap();
        bump_mtime(&path, 5);

        let stats = cache.get().await.unwrap();
        assert_eq!(stats, good);
        assert_eq!(cache.metrics().stale_served, 1);
    }

    #[tokio::test]
    async fn test_corrupt_store_without_prior_value_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.json");
        std::fs::write(&path, "{}").unwrap();
        let cache = StatsCache::new(Arc::new(CollectionStore::new(path)));

        let result = cache.get().await;
        assert!(matches!(result, Err(CatalogError::CorruptData(_))));
    }

    #[tokio::test]
    async fn test_concurrent_misses_compute_once() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(seeded_cache(&dir));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move { cache.get().await.unwrap() }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().total, 2);
        }

        let metrics = cache.metrics();
        assert_eq!(metrics.misses, 1);
        assert_eq!(metrics.hits, 15);
    }
}

//! Change Watcher Task
//!
//! Background task that detects out-of-band changes to the collection file
//! and pushes them to the stats cache.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::StatsCache;

/// Spawns a task that watches the store behind `cache` for changes.
///
/// Every `interval` the task re-reads the file's modification signal. Each
/// published signal, whether from this poll or from an `append` in this
/// process, marks the cached stats stale.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let handle = spawn_watch_task(cache.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_watch_task(cache: Arc<StatsCache>, interval: Duration) -> JoinHandle<()> {
    let store = cache.store().clone();
    let mut changes = store.subscribe();

    tokio::spawn(async move {
        info!(
            "Watching {} for changes every {:?}",
            store.path().display(),
            interval
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match store.poll_changes().await {
                        Ok(true) => debug!("Modification signal moved"),
                        Ok(false) => {}
                        Err(e) => warn!("Change poll failed: {}", e),
                    }
                }
                changed = changes.changed() => {
                    if changed.is_err() {
                        // Store dropped, nothing left to watch
                        break;
                    }
                    let signal = *changes.borrow_and_update();
                    cache.invalidate().await;
                    info!(
                        "Collection changed (generation {}, modified {:?}); stats cache invalidated",
                        signal.generation, signal.modified
                    );
                    debug!("Stats cache metrics: {:?}", cache.metrics());
                }
            }
        }
    })
}

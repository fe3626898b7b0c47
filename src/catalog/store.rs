//! Collection Store Module
//!
//! Owns the JSON file holding the catalog. Every write rewrites the whole
//! collection through a temp file and a rename, so readers only ever see a
//! complete old or complete new file.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::AsyncWriteExt;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::catalog::{ModSignal, Record, RecordDraft};
use crate::error::{CatalogError, Result};

// == Collection Store ==
/// File-backed store for the catalog collection.
#[derive(Debug)]
pub struct CollectionStore {
    /// Location of the JSON array
    path: PathBuf,
    /// Serializes load-modify-persist cycles of this process
    write_lock: Mutex<()>,
    /// Highest id handed out by this process
    last_id: AtomicU64,
    /// Number of successful writes made by this process
    generation: AtomicU64,
    /// Last published modification signal
    signal_tx: watch::Sender<ModSignal>,
}

impl CollectionStore {
    // == Constructor ==
    /// Creates a store over `path`. The file does not need to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (signal_tx, _) = watch::channel(ModSignal::default());
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            last_id: AtomicU64::new(0),
            generation: AtomicU64::new(0),
            signal_tx,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // == Load ==
    /// Reads the full collection.
    ///
    /// A missing or blank file is an empty collection.
    pub async fn load(&self) -> Result<Vec<Record>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Collection file {} absent, treating as empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(CatalogError::storage(&self.path, e)),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<Record> = serde_json::from_str(&raw)
            .map_err(|e| CatalogError::CorruptData(format!("{}: {}", self.path.display(), e)))?;

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !record.is_well_formed() {
                return Err(CatalogError::CorruptData(format!(
                    "record {} has empty or invalid fields",
                    record.id
                )));
            }
            if !seen.insert(record.id) {
                return Err(CatalogError::CorruptData(format!(
                    "duplicate id {}",
                    record.id
                )));
            }
        }

        Ok(records)
    }

    // == Get By Id ==
    pub async fn get_by_id(&self, id: u64) -> Result<Record> {
        self.load()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    // == Append ==
    /// Validates `draft`, assigns a fresh id and persists the updated collection.
    ///
    /// Concurrent appends from this process are serialized so none is lost.
    pub async fn append(&self, draft: RecordDraft) -> Result<Record> {
        let new_record = draft.validate()?;

        let _guard = self.write_lock.lock().await;

        let mut records = self.load().await?;
        let id = self.allocate_id(&records)?;
        let record = new_record.with_id(id);
        records.push(record.clone());

        self.persist(&records).await?;
        self.note_write().await;

        info!(
            "Appended item {} ({} items in collection)",
            record.id,
            records.len()
        );
        Ok(record)
    }

    fn allocate_id(&self, records: &[Record]) -> Result<u64> {
        let max_existing = records.iter().map(|r| r.id).max().unwrap_or(0);
        let next = self
            .last_id
            .load(Ordering::SeqCst)
            .max(max_existing)
            .checked_add(1)
            .ok_or_else(|| {
                CatalogError::StorageUnavailable("id space exhausted".to_string())
            })?;
        self.last_id.store(next, Ordering::SeqCst);
        Ok(next)
    }

    /// Records a completed write. The record is already durable, so a
    /// failure to publish the new signal is only logged; the bumped
    /// generation still makes the cache recompute on its next request.
    async fn note_write(&self) {
        // Bump only after the rename so a reader never pairs the new
        // generation with the old file content.
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.publish().await {
            warn!("Write persisted but change signal not published: {}", e);
        }
    }

    async fn persist(&self, records: &[Record]) -> Result<()> {
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| CatalogError::CorruptData(e.to_string()))?;
        let temp_path = self.path.with_extension("json.tmp");

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CatalogError::storage(parent, e))?;
        }

        let written = async {
            let mut file = tokio::fs::File::create(&temp_path).await?;
            file.write_all(content.as_bytes()).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&temp_path, &self.path).await
        }
        .await;

        if let Err(e) = written {
            // Best effort, the original error is what matters
            if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!("Failed to remove {}: {}", temp_path.display(), cleanup);
                }
            }
            return Err(CatalogError::storage(&self.path, e));
        }
        Ok(())
    }

    // == Modification Signal ==
    /// Reads the current modification signal from the filesystem.
    pub async fn current_signal(&self) -> Result<ModSignal> {
        let modified = match tokio::fs::metadata(&self.path).await {
            Ok(meta) => Some(
                meta.modified()
                    .map_err(|e| CatalogError::storage(&self.path, e))?,
            ),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(CatalogError::storage(&self.path, e)),
        };
        Ok(ModSignal::new(
            self.generation.load(Ordering::SeqCst),
            modified,
        ))
    }

    /// Subscribes to published modification signals.
    pub fn subscribe(&self) -> watch::Receiver<ModSignal> {
        self.signal_tx.subscribe()
    }

    // == Poll Changes ==
    /// Re-reads the signal and publishes it if it moved.
    ///
    /// Returns true when subscribers were notified.
    pub async fn poll_changes(&self) -> Result<bool> {
        self.publish().await
    }

    async fn publish(&self) -> Result<bool> {
        let current = self.current_signal().await?;
        Ok(self.signal_tx.send_if_modified(|last| {
            if current.has_changed_since(last) {
                *last = current;
                true
            } else {
                false
            }
        }))
    }
}

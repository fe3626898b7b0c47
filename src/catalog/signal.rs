//! Modification Signal
//!
//! Marker describing the last observed state of the backing file.

use std::time::SystemTime;

use chrono::{DateTime, Utc};

// == Mod Signal ==
/// Opaque, comparable marker for the durable state of the collection.
///
/// `generation` counts writes made by this process; `modified` is the
/// file's mtime as seen on the filesystem, `None` while the file is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModSignal {
    pub generation: u64,
    pub modified: Option<DateTime<Utc>>,
}

impl ModSignal {
    pub fn new(generation: u64, modified: Option<SystemTime>) -> Self {
        Self {
            generation,
            modified: modified.map(DateTime::<Utc>::from),
        }
    }

    // == Has Changed Since ==
    /// Returns true if this signal describes a different durable state than `observed`.
    ///
    /// Any mtime movement counts, including backwards (a file restored from a copy).
    pub fn has_changed_since(&self, observed: &ModSignal) -> bool {
        self.generation != observed.generation || self.modified != observed.modified
    }
}

//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Change watcher: polls the collection file and invalidates the stats cache

mod watcher;

pub use watcher::spawn_watch_task;

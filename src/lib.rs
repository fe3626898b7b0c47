//! Catalog Cache - file-backed catalog data service
//!
//! Serves paginated and searchable reads over a JSON collection file,
//! appends new records, and keeps a change-aware cache of aggregate stats.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{CatalogError, Result};
pub use tasks::spawn_watch_task;

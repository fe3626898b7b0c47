//! Catalog Module
//!
//! The file-backed collection of records and the pure query functions over it.

mod query;
mod record;
mod signal;
mod store;

pub use query::{paginate, search, Page, PageRequest, Pagination, DEFAULT_LIMIT, DEFAULT_PAGE};
pub use record::{NewRecord, Record, RecordDraft};
pub use signal::ModSignal;
pub use store::CollectionStore;

//! Request DTOs for the catalog API
//!
//! Defines the structure of incoming query strings. Item creation bodies
//! deserialize straight into [`RecordDraft`](crate::catalog::RecordDraft).

use serde::Deserialize;

use crate::catalog::PageRequest;

/// Query string for GET /api/items
///
/// `page` and `limit` are kept textual so that garbage falls back to the
/// defaults instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListItemsQuery {
    /// Substring to match against name or category
    #[serde(default)]
    pub q: Option<String>,
    /// 1-based page number
    #[serde(default)]
    pub page: Option<String>,
    /// Page size
    #[serde(default)]
    pub limit: Option<String>,
}

impl ListItemsQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref(), self.limit.as_deref())
    }
}

//! Query Engine
//!
//! Pure filtering and pagination over an already loaded collection snapshot.

use serde::Serialize;

use crate::catalog::Record;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

// == Search ==
/// Keeps records whose name or category contains `query`, ignoring case.
///
/// An empty or absent query returns the input untouched. Order is preserved.
pub fn search(records: Vec<Record>, query: Option<&str>) -> Vec<Record> {
    let needle = match query {
        Some(q) if !q.is_empty() => q.to_lowercase(),
        _ => return records,
    };

    records
        .into_iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&needle) || r.category.to_lowercase().contains(&needle)
        })
        .collect()
}

// == Page Request ==
/// Positive page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Parses textual page/limit values. Absent, unparsable or zero values
    /// fall back to the defaults.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit).unwrap_or(DEFAULT_LIMIT),
        }
    }
}

fn parse_positive(value: Option<&str>) -> Option<usize> {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
}

// == Page ==
/// Pagination metadata returned alongside a page of items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    /// Length of the filtered sequence before slicing
    pub total: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

// == Paginate ==
/// Slices one page out of `items`. Pages past the end are empty, not errors.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let PageRequest { page, limit } = request;
    let limit = limit.max(1);
    let total = items.len();
    let start = page.saturating_sub(1).saturating_mul(limit);

    let data = if start >= total {
        Vec::new()
    } else {
        items.into_iter().skip(start).take(limit).collect()
    };

    Page {
        data,
        pagination: Pagination {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit),
        },
    }
}

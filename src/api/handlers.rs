//! API Handlers
//!
//! HTTP request handlers for each catalog endpoint. Handlers only translate
//! between HTTP and the store, query engine and stats cache.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::cache::{StatsCache, StatsSnapshot};
use crate::catalog::{paginate, search, CollectionStore, Record, RecordDraft};
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::models::{HealthResponse, ItemsResponse, ListItemsQuery};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Collection file owner
    pub store: Arc<CollectionStore>,
    /// Stats cache over the same store
    pub stats: Arc<StatsCache>,
}

impl AppState {
    /// Creates a new AppState with the given store and a fresh stats cache.
    pub fn new(store: CollectionStore) -> Self {
        let store = Arc::new(store);
        Self {
            stats: Arc::new(StatsCache::new(store.clone())),
            store,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CollectionStore::new(config.data_path.clone()))
    }
}

/// Handler for GET /api/items
///
/// Filters by `q`, then returns the requested page.
pub async fn list_items_handler(
    State(state): State<AppState>,
    Query(query): Query<ListItemsQuery>,
) -> Result<Json<ItemsResponse>> {
    let records = state.store.load().await?;
    let filtered = search(records, query.q.as_deref());
    let page = paginate(filtered, query.page_request());

    debug!(
        "Listed page {} ({} of {} matches)",
        page.pagination.page,
        page.data.len(),
        page.pagination.total
    );
    Ok(Json(page))
}

/// Handler for GET /api/items/:id
///
/// Ids that are not integers cannot exist and are reported as not found.
pub async fn get_item_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Record>> {
    let id: u64 = id
        .parse()
        .map_err(|_| CatalogError::NotFound(id.clone()))?;
    let record = state.store.get_by_id(id).await?;

    Ok(Json(record))
}

/// Handler for POST /api/items
///
/// Malformed JSON bodies are reported as validation failures.
pub async fn create_item_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RecordDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Record>)> {
    let Json(draft) = payload.map_err(|e| CatalogError::Validation(e.body_text()))?;
    let record = state.store.append(draft).await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for GET /api/stats
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsSnapshot>> {
    let stats = state.stats.get().await?;

    Ok(Json(stats))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_state(dir: &TempDir) -> AppState {
        let path = dir.path().join("items.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "name": "Test Item 1", "category": "Electronics", "price": 100},
                {"id": 2, "name": "Test Item 2", "category": "Furniture", "price": 200}]"#,
        )
        .unwrap();
        AppState::new(CollectionStore::new(path))
    }

    #[tokio::test]
    async fn test_list_items_handler() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);

        let query = ListItemsQuery {
            q: Some("item 1".to_string()),
            ..Default::default()
        };
        let response = list_items_handler(State(state), Query(query)).await.unwrap();
        assert_eq!(response.data.len(), 1);
        assert_eq!(response.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_get_item_handler() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);

        let response = get_item_handler(State(state.clone()), Path("2".to_string()))
            .await
            .unwrap();
        assert_eq!(response.name, "Test Item 2");

        let missing = get_item_handler(State(state), Path("abc".to_string())).await;
        assert!(matches!(missing, Err(CatalogError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_then_stats() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);

        let before = stats_handler(State(state.clone())).await.unwrap();
        assert_eq!(before.total, 2);

        let draft = RecordDraft::new("Third", "Misc", 300.0);
        let (status, created) = create_item_handler(State(state.clone()), Ok(Json(draft)))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.name, "Third");

        let after = stats_handler(State(state)).await.unwrap();
        assert_eq!(after.total, 3);
        assert_eq!(after.average_price, 200.0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}

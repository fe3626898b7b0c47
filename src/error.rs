//! Error types for the catalog service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Catalog Error Enum ==
/// Unified error type for the catalog service.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// No record with the requested id
    #[error("Item not found: {0}")]
    NotFound(String),

    /// Malformed input to a write
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Backing file could not be read or written
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Backing file content is not a well-formed collection
    #[error("Corrupt data: {0}")]
    CorruptData(String),
}

impl CatalogError {
    /// Wraps an I/O failure on the backing store, keeping the path in the message.
    pub fn storage(path: &std::path::Path, err: std::io::Error) -> Self {
        CatalogError::StorageUnavailable(format!("{}: {}", path.display(), err))
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            CatalogError::CorruptData(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the catalog service.
pub type Result<T> = std::result::Result<T, CatalogError>;

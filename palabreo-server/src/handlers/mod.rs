//! Request handlers

mod interactions;
mod profiles;
mod render;
mod sync;
mod works;

pub use interactions::*;
pub use profiles::*;
pub use render::*;
pub use sync::*;
pub use works::*;

use crate::state::AppState;
use axum::{http::StatusCode, Json};
use palabreo_core::{CatalogError, Work};
use serde::Serialize;
use uuid::Uuid;

/// Error half of every fallible handler
pub type ApiError = (StatusCode, String);

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Work summary for listings
#[derive(Debug, Serialize)]
pub struct WorkSummary {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub genre: palabreo_core::Genre,
    pub chapters: usize,
    pub word_count: usize,
    pub views: u64,
    pub likes: u64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Work> for WorkSummary {
    fn from(work: &Work) -> Self {
        Self {
            id: work.id,
            author_id: work.author_id,
            title: work.title.clone(),
            genre: work.genre,
            chapters: work.chapter_count(),
            word_count: work.word_count(),
            views: work.views,
            likes: work.likes,
            created_at: work.created_at,
        }
    }
}

/// Map a catalog failure to a response
pub(crate) fn catalog_error(e: CatalogError) -> ApiError {
    let status = match &e {
        CatalogError::WorkNotFound(_) | CatalogError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::UsernameTaken(_) | CatalogError::AccountHasProfile(_) => {
            StatusCode::CONFLICT
        }
        CatalogError::SelfFollow | CatalogError::InvalidInput(_) => StatusCode::BAD_REQUEST,
    };
    (status, e.to_string())
}

/// Parse a path id
pub(crate) fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(id).map_err(|_| (StatusCode::BAD_REQUEST, format!("Invalid id: {id}")))
}

/// Write the catalog after a mutation
pub(crate) async fn persist(state: &AppState) -> Result<(), ApiError> {
    state.save_catalog().await.map_err(|e| {
        tracing::error!("Failed to save catalog: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to save catalog".to_string(),
        )
    })
}

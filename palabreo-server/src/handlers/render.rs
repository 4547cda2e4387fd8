//! Markdown preview

use crate::state::AppState;
use axum::{extract::State, Json};
use palabreo_core::TrustedHtml;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub content: String,
}

/// Render markdown the way the reading view will show it
pub async fn render_preview(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Json<TrustedHtml> {
    Json(state.render(&request.content).await)
}

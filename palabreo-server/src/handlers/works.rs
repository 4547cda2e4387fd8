//! Work management and reading handlers

use super::{catalog_error, parse_id, persist, ApiError, WorkSummary};
use crate::state::{AppState, ServerEvent};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use palabreo_core::catalog::{NewWork, WorkChanges};
use palabreo_core::{
    Catalog, CatalogError, Genre, Page, ReadingSession, TrustedHtml, Work, WorkQuery,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// List published works
pub async fn list_works(
    State(state): State<AppState>,
    Query(query): Query<WorkQuery>,
) -> Json<Page<WorkSummary>> {
    let catalog = state.catalog.read().await;
    Json(catalog.public_works(&query).map(|w| WorkSummary::from(&w)))
}

/// Create a work from explicit fields
pub async fn create_work(
    State(state): State<AppState>,
    Json(input): Json<NewWork>,
) -> Result<(StatusCode, Json<Work>), ApiError> {
    let work = {
        let mut catalog = state.catalog.write().await;
        catalog.create_work(input).map_err(catalog_error)?
    };
    persist(&state).await?;

    tracing::info!("Created work {} ({})", work.title, work.id);
    state.broadcast(ServerEvent::WorkCreated {
        id: work.id,
        title: work.title.clone(),
    });
    Ok((StatusCode::CREATED, Json(work)))
}

/// Markdown manuscript upload
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub author_id: Uuid,
    /// Overrides the first heading as the title
    pub title: Option<String>,
    #[serde(default)]
    pub genre: Genre,
    pub markdown: String,
}

/// Create a work from a markdown manuscript, one chapter per top-level heading
pub async fn import_work(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Result<(StatusCode, Json<Work>), ApiError> {
    let work = Work::from_markdown(
        request.author_id,
        request.title.as_deref(),
        request.genre,
        &request.markdown,
    );
    let work = {
        let mut catalog = state.catalog.write().await;
        catalog.add_work(work).map_err(catalog_error)?
    };
    persist(&state).await?;

    tracing::info!(
        "Imported work {} with {} chapters",
        work.title,
        work.chapter_count()
    );
    state.broadcast(ServerEvent::WorkCreated {
        id: work.id,
        title: work.title.clone(),
    });
    Ok((StatusCode::CREATED, Json(work)))
}

#[derive(Debug, Serialize)]
pub struct ChapterSummary {
    pub index: usize,
    pub title: String,
    pub word_count: usize,
}

/// Work metadata with its table of contents
#[derive(Debug, Serialize)]
pub struct WorkResponse {
    #[serde(flatten)]
    pub work: Work,
    pub table_of_contents: Vec<ChapterSummary>,
    pub comment_count: usize,
}

/// Get a single work
pub async fn get_work(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WorkResponse>, ApiError> {
    let id = parse_id(&id)?;
    let catalog = state.catalog.read().await;
    let work = catalog
        .work(id)
        .ok_or_else(|| catalog_error(CatalogError::WorkNotFound(id)))?;

    let table_of_contents = work
        .reading_chapters()
        .iter()
        .enumerate()
        .map(|(index, c)| ChapterSummary {
            index,
            title: c.title.clone(),
            word_count: c.word_count(),
        })
        .collect();

    Ok(Json(WorkResponse {
        work: work.clone(),
        table_of_contents,
        comment_count: catalog.comments_for(id).len(),
    }))
}

/// Edit a work's title, genre or text
pub async fn update_work(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(changes): Json<WorkChanges>,
) -> Result<Json<Work>, ApiError> {
    let id = parse_id(&id)?;
    let work = {
        let mut catalog = state.catalog.write().await;
        catalog.update_work(id, changes).map_err(catalog_error)?
    };
    persist(&state).await?;

    state.broadcast(ServerEvent::WorkUpdated { id });
    Ok(Json(work))
}

/// Delete a work with its interactions
pub async fn delete_work(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let work = {
        let mut catalog = state.catalog.write().await;
        catalog.delete_work(id).map_err(catalog_error)?
    };
    persist(&state).await?;

    tracing::info!("Deleted work {} ({})", work.title, id);
    state.broadcast(ServerEvent::WorkDeleted { id });
    Ok(StatusCode::NO_CONTENT)
}

/// Apply a lifecycle transition and announce it
async fn transition(
    state: &AppState,
    id: &str,
    apply: fn(&mut Catalog, Uuid) -> Result<Work, CatalogError>,
) -> Result<Json<Work>, ApiError> {
    let id = parse_id(id)?;
    let work = {
        let mut catalog = state.catalog.write().await;
        apply(&mut catalog, id).map_err(catalog_error)?
    };
    persist(state).await?;

    let event = if work.archived {
        ServerEvent::WorkArchived { id }
    } else if work.published {
        ServerEvent::WorkPublished {
            id,
            title: work.title.clone(),
        }
    } else {
        ServerEvent::WorkUpdated { id }
    };
    state.broadcast(event);
    Ok(Json(work))
}

pub async fn publish_work(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Work>, ApiError> {
    transition(&state, &id, Catalog::publish).await
}

pub async fn unpublish_work(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Work>, ApiError> {
    transition(&state, &id, Catalog::unpublish).await
}

pub async fn archive_work(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Work>, ApiError> {
    transition(&state, &id, Catalog::archive).await
}

pub async fn unarchive_work(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Work>, ApiError> {
    transition(&state, &id, Catalog::unarchive).await
}

#[derive(Debug, Serialize)]
pub struct ViewsResponse {
    pub views: u64,
}

/// Count a view
pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ViewsResponse>, ApiError> {
    let id = parse_id(&id)?;
    let views = {
        let mut catalog = state.catalog.write().await;
        catalog.record_view(id).map_err(catalog_error)?
    };
    persist(&state).await?;
    Ok(Json(ViewsResponse { views }))
}

/// One chapter prepared for the reading view
#[derive(Debug, Serialize)]
pub struct ChapterResponse {
    pub work_id: Uuid,
    pub work_title: String,
    /// Index actually served, after clamping
    pub index: usize,
    pub chapter_count: usize,
    pub title: String,
    pub html: TrustedHtml,
    pub progress: f32,
    pub has_previous: bool,
    pub has_next: bool,
}

/// Read a chapter; out-of-range indices are clamped to the nearest chapter
pub async fn read_chapter(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, i64)>,
) -> Result<Json<ChapterResponse>, ApiError> {
    let id = parse_id(&id)?;
    let mut session = {
        let catalog = state.catalog.read().await;
        let work = catalog
            .work(id)
            .ok_or_else(|| catalog_error(CatalogError::WorkNotFound(id)))?;
        ReadingSession::new(work)
    };

    session.go_to(index);
    let chapter = session.active_chapter();
    let html = state.render(&chapter.content).await;

    Ok(Json(ChapterResponse {
        work_id: id,
        work_title: session.title().to_string(),
        index: session.active_index(),
        chapter_count: session.chapter_count(),
        title: chapter.title.clone(),
        html,
        progress: session.progress(),
        has_previous: session.has_previous(),
        has_next: session.has_next(),
    }))
}

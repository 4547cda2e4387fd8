//! Likes, bookmarks and comments

use super::{catalog_error, parse_id, persist, ApiError};
use crate::state::{AppState, ServerEvent};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use palabreo_core::{CatalogError, Comment};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub liked: bool,
    /// False when the request repeated the current state
    pub changed: bool,
    pub likes: u64,
}

async fn set_like(
    state: &AppState,
    id: &str,
    user_id: &str,
    liked: bool,
) -> Result<Json<LikeResponse>, ApiError> {
    let work_id = parse_id(id)?;
    let user_id = parse_id(user_id)?;
    let (changed, likes) = {
        let mut catalog = state.catalog.write().await;
        let changed = if liked {
            catalog.like(user_id, work_id)
        } else {
            catalog.unlike(user_id, work_id)
        }
        .map_err(catalog_error)?;
        let likes = catalog.work(work_id).map(|w| w.likes).unwrap_or_default();
        (changed, likes)
    };
    if changed {
        persist(state).await?;
    }
    Ok(Json(LikeResponse {
        liked,
        changed,
        likes,
    }))
}

pub async fn like_work(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<Json<LikeResponse>, ApiError> {
    set_like(&state, &id, &user_id, true).await
}

pub async fn unlike_work(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<Json<LikeResponse>, ApiError> {
    set_like(&state, &id, &user_id, false).await
}

#[derive(Debug, Serialize)]
pub struct BookmarkResponse {
    pub bookmarked: bool,
    pub changed: bool,
}

async fn set_bookmark(
    state: &AppState,
    id: &str,
    user_id: &str,
    bookmarked: bool,
) -> Result<Json<BookmarkResponse>, ApiError> {
    let work_id = parse_id(id)?;
    let user_id = parse_id(user_id)?;
    let changed = {
        let mut catalog = state.catalog.write().await;
        let result = if bookmarked {
            catalog.bookmark(user_id, work_id)
        } else {
            catalog.unbookmark(user_id, work_id)
        };
        result.map_err(catalog_error)?
    };
    if changed {
        persist(state).await?;
    }
    Ok(Json(BookmarkResponse {
        bookmarked,
        changed,
    }))
}

pub async fn bookmark_work(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<Json<BookmarkResponse>, ApiError> {
    set_bookmark(&state, &id, &user_id, true).await
}

pub async fn remove_bookmark(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(String, String)>,
) -> Result<Json<BookmarkResponse>, ApiError> {
    set_bookmark(&state, &id, &user_id, false).await
}

/// Comments on a work, oldest first
pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let id = parse_id(&id)?;
    let catalog = state.catalog.read().await;
    if catalog.work(id).is_none() {
        return Err(catalog_error(CatalogError::WorkNotFound(id)));
    }
    Ok(Json(catalog.comments_for(id)))
}

#[derive(Debug, Deserialize)]
pub struct NewComment {
    pub user_id: Uuid,
    pub body: String,
}

pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<NewComment>,
) -> Result<(StatusCode, Json<Comment>), ApiError> {
    let id = parse_id(&id)?;
    let comment = {
        let mut catalog = state.catalog.write().await;
        catalog
            .add_comment(id, input.user_id, &input.body)
            .map_err(catalog_error)?
    };
    persist(&state).await?;

    state.broadcast(ServerEvent::CommentAdded {
        work_id: id,
        comment_id: comment.id,
    });
    Ok((StatusCode::CREATED, Json(comment)))
}

//! Author profiles and follows

use super::{catalog_error, parse_id, persist, ApiError, WorkSummary};
use crate::state::{AppState, ServerEvent};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use palabreo_core::catalog::NewProfile;
use palabreo_core::{CatalogError, Profile};
use serde::Serialize;
use uuid::Uuid;

pub async fn create_profile(
    State(state): State<AppState>,
    Json(input): Json<NewProfile>,
) -> Result<(StatusCode, Json<Profile>), ApiError> {
    let profile = {
        let mut catalog = state.catalog.write().await;
        catalog.create_profile(input).map_err(catalog_error)?
    };
    persist(&state).await?;

    tracing::info!("Created profile @{}", profile.username);
    state.broadcast(ServerEvent::ProfileCreated {
        id: profile.id,
        username: profile.username.clone(),
    });
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Public profile page
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub followers: usize,
    pub following: usize,
    /// Published, non-archived works only
    pub works: Vec<WorkSummary>,
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let catalog = state.catalog.read().await;
    let profile = catalog
        .profile_by_username(&username)
        .ok_or_else(|| catalog_error(CatalogError::ProfileNotFound(username.clone())))?;

    Ok(Json(ProfileResponse {
        profile: profile.clone(),
        followers: catalog.followers_of(profile.id).len(),
        following: catalog.following_of(profile.id).len(),
        works: catalog
            .works_by_author(profile.id, false)
            .iter()
            .map(WorkSummary::from)
            .collect(),
    }))
}

#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub following: bool,
    pub changed: bool,
    pub followers: usize,
}

async fn set_follow(
    state: &AppState,
    username: &str,
    follower_id: &str,
    follow: bool,
) -> Result<Json<FollowResponse>, ApiError> {
    let follower_id = parse_id(follower_id)?;
    let (changed, followers) = {
        let mut catalog = state.catalog.write().await;
        let followed_id: Uuid = catalog
            .profile_by_username(username)
            .map(|p| p.id)
            .ok_or_else(|| catalog_error(CatalogError::ProfileNotFound(username.to_string())))?;
        let result = if follow {
            catalog.follow(follower_id, followed_id)
        } else {
            catalog.unfollow(follower_id, followed_id)
        };
        let changed = result.map_err(catalog_error)?;
        (changed, catalog.followers_of(followed_id).len())
    };
    if changed {
        persist(state).await?;
    }
    Ok(Json(FollowResponse {
        following: follow,
        changed,
        followers,
    }))
}

pub async fn follow_profile(
    State(state): State<AppState>,
    Path((username, follower_id)): Path<(String, String)>,
) -> Result<Json<FollowResponse>, ApiError> {
    set_follow(&state, &username, &follower_id, true).await
}

pub async fn unfollow_profile(
    State(state): State<AppState>,
    Path((username, follower_id)): Path<(String, String)>,
) -> Result<Json<FollowResponse>, ApiError> {
    set_follow(&state, &username, &follower_id, false).await
}

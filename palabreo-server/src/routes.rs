//! API routes

use crate::config::CorsOrigins;
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the application router with the development CORS origins
pub fn create_router(state: AppState) -> Router {
    create_router_with_cors(state, &CorsOrigins::default())
}

/// Create the application router
pub fn create_router_with_cors(state: AppState, origins: &CorsOrigins) -> Router {
    let api_routes = Router::new()
        .route("/render", post(handlers::render_preview))
        // Works
        .route(
            "/works",
            get(handlers::list_works).post(handlers::create_work),
        )
        .route("/works/import", post(handlers::import_work))
        .route(
            "/works/:id",
            get(handlers::get_work)
                .put(handlers::update_work)
                .delete(handlers::delete_work),
        )
        .route("/works/:id/publish", post(handlers::publish_work))
        .route("/works/:id/unpublish", post(handlers::unpublish_work))
        .route("/works/:id/archive", post(handlers::archive_work))
        .route("/works/:id/unarchive", post(handlers::unarchive_work))
        .route("/works/:id/views", post(handlers::record_view))
        .route("/works/:id/chapters/:index", get(handlers::read_chapter))
        // Interactions
        .route(
            "/works/:id/likes/:user_id",
            put(handlers::like_work).delete(handlers::unlike_work),
        )
        .route(
            "/works/:id/bookmarks/:user_id",
            put(handlers::bookmark_work).delete(handlers::remove_bookmark),
        )
        .route(
            "/works/:id/comments",
            get(handlers::list_comments).post(handlers::add_comment),
        )
        // Profiles
        .route("/profiles", post(handlers::create_profile))
        .route("/profiles/:username", get(handlers::get_profile))
        .route(
            "/profiles/:username/followers/:follower_id",
            put(handlers::follow_profile).delete(handlers::unfollow_profile),
        )
        // SSE endpoint
        .route("/sync", get(handlers::sync_events));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(origins)),
        )
        .with_state(state)
}

fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::any(),
        CorsOrigins::List(list) => {
            let allowed: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!("Ignoring invalid CORS origin {}", origin);
                        None
                    }
                })
                .collect();
            AllowOrigin::list(allowed)
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

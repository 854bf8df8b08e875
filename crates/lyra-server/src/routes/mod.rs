//! HTTP route handlers and router assembly.

pub mod health;
pub mod lyrics;
pub mod playlist;
pub mod search;
pub mod stream;
pub mod thumbnail;
pub mod track;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full API router.
pub fn router(state: AppState, frontend_url: &str) -> Router {
    Router::new()
        .route("/api/search", get(search::search))
        .route("/api/track/{id}", get(track::track))
        .route("/api/stream/{id}", get(stream::stream))
        .route("/api/lyrics/{id}", get(lyrics::lyrics))
        .route("/api/lyrics/{id}/transcribe", post(lyrics::transcribe))
        .route("/api/thumbnail/{id}", get(thumbnail::thumbnail))
        .route("/api/playlist/create", post(playlist::create))
        .route("/api/health", get(health::health))
        .layer(cors(frontend_url))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Allow the configured frontend origin, or any origin when the
/// configured value is not a valid header.
fn cors(frontend_url: &str) -> CorsLayer {
    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => CorsLayer::permissive(),
    }
}

//! `/api/playlist/create` — local playlist persistence stub.
//!
//! Playlists live in the web player's local storage; the backend only
//! acknowledges creation with a deterministic id.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_ids: Vec<String>,
}

/// POST /api/playlist/create
pub async fn create(
    State(_state): State<AppState>,
    Json(req): Json<CreatePlaylistRequest>,
) -> Result<Json<Value>, ApiError> {
    let Some(title) = req.title.filter(|t| !t.is_empty()) else {
        return Err(ApiError::BadRequest("Title required".into()));
    };
    Ok(Json(json!({
        "success": true,
        "message": "Playlist saved locally",
        "id": format!("local_{}", title.replace(' ', "_")),
    })))
}

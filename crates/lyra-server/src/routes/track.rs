//! `/api/track/{id}` — resolve a track to its direct audio URL.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use lyra_resolver::TrackRef;

use crate::errors::ApiError;
use crate::state::AppState;

/// Resolved track response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackResponse {
    pub video_id: TrackRef,
    /// Time-limited direct media URL; re-resolve rather than cache it.
    pub audio_url: String,
    pub title: Option<String>,
    pub duration: Option<f64>,
}

/// GET /api/track/{id}
pub async fn track(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrackResponse>, ApiError> {
    let track = TrackRef::parse(&id)?;
    let resolved = state.extractor.resolve(&track).await?;
    Ok(Json(TrackResponse {
        video_id: track,
        audio_url: resolved.media_url,
        title: resolved.title,
        duration: resolved.duration,
    }))
}

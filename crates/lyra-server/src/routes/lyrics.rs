//! `/api/lyrics/{id}` — read and trigger endpoints for transcription.

use axum::Json;
use axum::extract::{Path, State};

use lyra_resolver::TrackRef;
use lyra_transcription::TranscriptionRecord;

use crate::errors::ApiError;
use crate::state::AppState;

/// GET /api/lyrics/{id}
///
/// Purely observational: returns the durable record if one exists,
/// otherwise an in-progress placeholder. Cheap to poll.
pub async fn lyrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TranscriptionRecord>, ApiError> {
    let track = TrackRef::parse(&id)?;
    let record = state.worker.current(&track).await?;
    Ok(Json(record))
}

/// POST /api/lyrics/{id}/transcribe
///
/// Runs the full pipeline, or short-circuits to the already-finished
/// record. The request blocks for the duration of the job (tens of
/// seconds on a cache miss); the job itself runs off the async
/// executor threads.
pub async fn transcribe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TranscriptionRecord>, ApiError> {
    let track = TrackRef::parse(&id)?;
    let record = state.worker.transcribe(&track).await?;
    Ok(Json(record))
}

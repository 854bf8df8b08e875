//! HTTP error mapping.
//!
//! Every handler returns `Result<_, ApiError>`; the `IntoResponse`
//! impl turns the error into a JSON body with a machine-readable
//! `code` and a human message. Lyrics failures additionally carry a
//! fixed `lyrics` string so clients can distinguish "gave up" from the
//! in-progress placeholder text.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use lyra_resolver::ResolveError;
use lyra_transcription::TranscriptionError;

/// Lyrics text returned on any transcription failure.
const FAILED_LYRICS: &str = "Transcription failed";

/// Errors surfaced to HTTP clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request (bad track id, missing parameter).
    #[error("{0}")]
    BadRequest(String),

    /// The resolver found no playable audio for the track.
    #[error("no audio found for {0}")]
    NoAudioFound(String),

    /// The extractor or the upstream media host failed.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// A transcription trigger or cache read failed.
    #[error(transparent)]
    Lyrics(#[from] TranscriptionError),

    /// Anything else; details go to the log, not the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Machine-readable error code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NoAudioFound(_) => "NO_AUDIO_FOUND",
            Self::Upstream(_) => "UPSTREAM_ERROR",
            Self::Lyrics(TranscriptionError::Cache(_)) => "CACHE_ERROR",
            Self::Lyrics(_) => "TRANSCRIPTION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status for the response.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NoAudioFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) | Self::Lyrics(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NoAudioFound(id) => Self::NoAudioFound(id),
            ResolveError::InvalidTrack(id) => {
                Self::BadRequest(format!("invalid track identifier: {id}"))
            }
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(code = self.code(), error = %self, "request failed");
        let mut body = json!({
            "error": self.to_string(),
            "code": self.code(),
        });
        if matches!(self, Self::Lyrics(_)) {
            body["lyrics"] = json!(FAILED_LYRICS);
        }
        (self.status(), Json(body)).into_response()
    }
}

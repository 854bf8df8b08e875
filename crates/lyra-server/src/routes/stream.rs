//! `/api/stream/{id}` — the byte-range audio proxy.
//!
//! Each request re-resolves the track (upstream URLs are time-limited)
//! and relays the upstream body as it arrives. The client's `Range`
//! header is forwarded verbatim; upstream is authoritative for range
//! syntax and satisfiability. Dropping the response body releases the
//! upstream connection on every exit path, including client disconnect.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Response;
use tracing::debug;

use lyra_resolver::TrackRef;

use crate::errors::ApiError;
use crate::state::AppState;

/// GET /api/stream/{id}
pub async fn stream(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let track = TrackRef::parse(&id)?;
    let resolved = state.extractor.resolve(&track).await?;
    debug!(track = %track, codec = ?resolved.codec, "resolved stream");

    let range = headers.get(header::RANGE);
    let mut upstream_req = state.http.get(&resolved.media_url);
    if let Some(range) = range {
        upstream_req = upstream_req.header(header::RANGE, range.clone());
    }
    let upstream = upstream_req
        .send()
        .await
        .map_err(|e| ApiError::Upstream(format!("media fetch: {e}")))?;

    let upstream_status = upstream.status();
    if !upstream_status.is_success() {
        return Err(ApiError::Upstream(format!(
            "media host returned {upstream_status}"
        )));
    }

    // Partial-content semantics only when the client asked for a range
    // and upstream honored it
    let partial = range.is_some() && upstream_status == StatusCode::PARTIAL_CONTENT;

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| {
            header::HeaderValue::from_str(&resolved.content_type)
                .unwrap_or(header::HeaderValue::from_static("audio/webm"))
        });

    let mut builder = Response::builder()
        .status(if partial {
            StatusCode::PARTIAL_CONTENT
        } else {
            StatusCode::OK
        })
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ACCEPT_RANGES, "bytes");

    if partial {
        if let Some(content_range) = upstream.headers().get(header::CONTENT_RANGE) {
            builder = builder.header(header::CONTENT_RANGE, content_range.clone());
        }
    }
    if let Some(content_length) = upstream.headers().get(header::CONTENT_LENGTH) {
        builder = builder.header(header::CONTENT_LENGTH, content_length.clone());
    }

    builder
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| ApiError::Internal(format!("response build: {e}")))
}

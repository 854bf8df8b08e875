//! `/api/thumbnail/{id}` — probe for the best available cover image.
//!
//! The image host serves a fixed quality ladder per track; not every
//! rung exists for every track, so we HEAD-probe from best to worst
//! and return the first hit. This endpoint never errors: on any
//! failure it falls back to the quality that exists for nearly all
//! tracks.

use std::time::Duration;

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use tracing::debug;

use crate::state::AppState;

/// Qualities to probe, best first.
const QUALITIES: [&str; 5] = [
    "maxresdefault",
    "sddefault",
    "hqdefault",
    "mqdefault",
    "default",
];

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Thumbnail response body.
#[derive(Debug, Serialize)]
pub struct ThumbnailResponse {
    pub thumbnail_url: String,
}

/// GET /api/thumbnail/{id}
pub async fn thumbnail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ThumbnailResponse> {
    for quality in QUALITIES {
        let url = thumbnail_url(&id, quality);
        let probe = state
            .http
            .head(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await;
        match probe {
            Ok(resp) if resp.status().is_success() => {
                return Json(ThumbnailResponse { thumbnail_url: url });
            }
            Ok(_) => {}
            Err(e) => {
                debug!(track = %id, quality, error = %e, "thumbnail probe failed");
                break;
            }
        }
    }
    Json(ThumbnailResponse {
        thumbnail_url: thumbnail_url(&id, "hqdefault"),
    })
}

fn thumbnail_url(id: &str, quality: &str) -> String {
    format!("https://i.ytimg.com/vi/{id}/{quality}.jpg")
}

//! `/api/search` — catalog search shaped for the web player.
//!
//! The player consumes a Spotify-like response, so results are wrapped
//! in `{tracks: {items: [...]}}` with artist and album objects.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use lyra_resolver::SearchEntry;

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// GET /api/search?q=...
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiError> {
    if params.q.is_empty() {
        return Err(ApiError::BadRequest("Query parameter required".into()));
    }
    let entries = state
        .extractor
        .search(&params.q, state.search_limit)
        .await?;
    let items: Vec<Value> = entries.iter().filter_map(format_entry).collect();
    Ok(Json(json!({ "tracks": { "items": items } })))
}

/// Shape one search entry; entries without a track id are dropped.
fn format_entry(entry: &SearchEntry) -> Option<Value> {
    let id = entry.id.as_deref()?;
    let thumbnail = format!("https://i.ytimg.com/vi/{id}/maxresdefault.jpg");
    let duration_ms = entry.duration.map_or(0, |secs| (secs * 1000.0) as u64);
    Some(json!({
        "id": id,
        "name": entry.title,
        "artists": [{ "name": entry.artist() }],
        "album": {
            "name": "Unknown Album",
            "images": [{ "url": thumbnail, "height": 640, "width": 640 }],
        },
        "duration_ms": duration_ms,
        "uri": format!("ytmusic:{id}"),
        "preview_url": null,
        "external_urls": {
            "youtube": format!("https://music.youtube.com/watch?v={id}"),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_formatting() {
        let entry = SearchEntry {
            id: Some("abc123".into()),
            title: Some("Song".into()),
            channel: Some("Artist - Topic".into()),
            uploader: None,
            duration: Some(212.5),
        };
        let v = format_entry(&entry).unwrap();
        assert_eq!(v["id"], "abc123");
        assert_eq!(v["name"], "Song");
        assert_eq!(v["duration_ms"], 212_500);
        assert_eq!(v["uri"], "ytmusic:abc123");
        assert_eq!(
            v["external_urls"]["youtube"],
            "https://music.youtube.com/watch?v=abc123"
        );
        assert!(
            v["album"]["images"][0]["url"]
                .as_str()
                .unwrap()
                .contains("abc123")
        );
    }

    #[test]
    fn missing_duration_is_zero_ms() {
        let entry = SearchEntry {
            id: Some("abc123".into()),
            ..SearchEntry::default()
        };
        assert_eq!(format_entry(&entry).unwrap()["duration_ms"], 0);
    }

    #[test]
    fn entry_without_id_is_dropped() {
        assert!(format_entry(&SearchEntry::default()).is_none());
    }
}

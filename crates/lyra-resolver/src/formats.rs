//! Extractor info-dump model and audio format selection.
//!
//! The extractor emits one large JSON object per track (`yt-dlp -J`).
//! Only the fields the selection policy needs are deserialized; the
//! rest of the dump is ignored.

use serde::Deserialize;

use crate::errors::ResolveError;
use crate::track::TrackRef;

/// One entry of the extractor's `formats` / `requested_formats` lists.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Format {
    /// Direct media URL, when present.
    pub url: Option<String>,
    /// Audio codec name, or `"none"` for video-only formats.
    pub acodec: Option<String>,
    /// Container extension (`m4a`, `webm`, ...).
    pub ext: Option<String>,
    /// Extractor-assigned format identifier.
    pub format_id: Option<String>,
}

impl Format {
    /// Whether this format carries an audio track.
    fn has_audio(&self) -> bool {
        matches!(&self.acodec, Some(codec) if codec != "none")
    }
}

/// Subset of the extractor's JSON info dump.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct InfoDump {
    /// Direct URL when the extractor already selected a best format.
    pub url: Option<String>,
    /// Track title.
    pub title: Option<String>,
    /// Track duration in seconds.
    pub duration: Option<f64>,
    /// Audio codec of the selected format, when chosen directly.
    pub acodec: Option<String>,
    /// Container extension of the selected format.
    pub ext: Option<String>,
    /// All available formats.
    #[serde(default)]
    pub formats: Vec<Format>,
    /// Formats the extractor picked for the requested selector.
    #[serde(default)]
    pub requested_formats: Vec<Format>,
}

/// A live, time-limited audio stream for one track.
///
/// Never cached: the URL embeds short-lived authorization, so each
/// streaming request resolves a fresh one and discards it afterwards.
#[derive(Clone, Debug)]
pub struct ResolvedStream {
    /// Direct media URL.
    pub media_url: String,
    /// Audio codec hint, when known.
    pub codec: Option<String>,
    /// MIME type guess for the container.
    pub content_type: String,
    /// Approximate duration in seconds.
    pub duration: Option<f64>,
    /// Track title.
    pub title: Option<String>,
}

/// Candidate produced by the selection policy.
struct SelectedAudio {
    url: String,
    codec: Option<String>,
    ext: Option<String>,
}

/// Apply the audio-format selection policy to an info dump.
///
/// Order:
/// 1. the top-level `url` when the extractor already chose a format;
/// 2. else the first `requested_formats` entry with an audio codec;
/// 3. else (only when `requested_formats` is empty) the first `formats`
///    entry with both an audio codec and a non-empty URL.
fn select_audio(info: &InfoDump) -> Option<SelectedAudio> {
    if let Some(url) = non_empty(info.url.as_deref()) {
        return Some(SelectedAudio {
            url: url.to_owned(),
            codec: info.acodec.clone().filter(|c| c != "none"),
            ext: info.ext.clone(),
        });
    }

    if !info.requested_formats.is_empty() {
        let format = info.requested_formats.iter().find(|f| f.has_audio())?;
        let url = non_empty(format.url.as_deref())?;
        return Some(SelectedAudio {
            url: url.to_owned(),
            codec: format.acodec.clone(),
            ext: format.ext.clone(),
        });
    }

    info.formats
        .iter()
        .find(|f| f.has_audio() && non_empty(f.url.as_deref()).is_some())
        .map(|format| SelectedAudio {
            url: format.url.clone().unwrap_or_default(),
            codec: format.acodec.clone(),
            ext: format.ext.clone(),
        })
}

/// Build a [`ResolvedStream`] from an info dump, or fail with
/// [`ResolveError::NoAudioFound`].
pub fn resolve_stream(track: &TrackRef, info: &InfoDump) -> Result<ResolvedStream, ResolveError> {
    let selected =
        select_audio(info).ok_or_else(|| ResolveError::NoAudioFound(track.to_string()))?;

    Ok(ResolvedStream {
        content_type: content_type_for_ext(selected.ext.as_deref()),
        media_url: selected.url,
        codec: selected.codec,
        duration: info.duration,
        title: info.title.clone(),
    })
}

/// MIME type for a container extension, defaulting to `audio/webm`.
pub fn content_type_for_ext(ext: Option<&str>) -> String {
    match ext {
        Some("m4a" | "mp4" | "aac") => "audio/mp4",
        Some("mp3") => "audio/mpeg",
        Some("ogg" | "opus") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("wav") => "audio/wav",
        _ => "audio/webm",
    }
    .to_owned()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> TrackRef {
        TrackRef::parse("abc123").unwrap()
    }

    fn fmt(url: Option<&str>, acodec: Option<&str>) -> Format {
        Format {
            url: url.map(str::to_owned),
            acodec: acodec.map(str::to_owned),
            ext: Some("webm".into()),
            format_id: None,
        }
    }

    #[test]
    fn top_level_url_wins() {
        let info = InfoDump {
            url: Some("https://cdn/top".into()),
            acodec: Some("opus".into()),
            formats: vec![fmt(Some("https://cdn/other"), Some("aac"))],
            ..InfoDump::default()
        };
        let stream = resolve_stream(&track(), &info).unwrap();
        assert_eq!(stream.media_url, "https://cdn/top");
        assert_eq!(stream.codec.as_deref(), Some("opus"));
    }

    #[test]
    fn requested_formats_scanned_for_audio_codec() {
        let info = InfoDump {
            requested_formats: vec![
                fmt(Some("https://cdn/video"), Some("none")),
                fmt(Some("https://cdn/audio"), Some("mp4a.40.2")),
            ],
            ..InfoDump::default()
        };
        let stream = resolve_stream(&track(), &info).unwrap();
        assert_eq!(stream.media_url, "https://cdn/audio");
    }

    #[test]
    fn formats_list_needs_codec_and_url() {
        // Only the third entry has both a usable codec and a URL.
        let info = InfoDump {
            formats: vec![
                fmt(Some("https://cdn/video"), Some("none")),
                fmt(None, Some("opus")),
                fmt(Some("https://cdn/third"), Some("opus")),
            ],
            ..InfoDump::default()
        };
        let stream = resolve_stream(&track(), &info).unwrap();
        assert_eq!(stream.media_url, "https://cdn/third");
    }

    #[test]
    fn requested_formats_shadow_formats_list() {
        // When requested_formats exists but has no audio entry, the
        // full formats list is not scanned (matches the upstream flow).
        let info = InfoDump {
            requested_formats: vec![fmt(Some("https://cdn/video"), Some("none"))],
            formats: vec![fmt(Some("https://cdn/audio"), Some("opus"))],
            ..InfoDump::default()
        };
        let err = resolve_stream(&track(), &info).unwrap_err();
        assert!(matches!(err, ResolveError::NoAudioFound(_)));
    }

    #[test]
    fn empty_dump_is_no_audio_found() {
        let err = resolve_stream(&track(), &InfoDump::default()).unwrap_err();
        assert!(matches!(err, ResolveError::NoAudioFound(id) if id == "abc123"));
    }

    #[test]
    fn missing_acodec_is_not_audio() {
        let info = InfoDump {
            formats: vec![fmt(Some("https://cdn/x"), None)],
            ..InfoDump::default()
        };
        assert!(resolve_stream(&track(), &info).is_err());
    }

    #[test]
    fn content_type_mapping() {
        assert_eq!(content_type_for_ext(Some("m4a")), "audio/mp4");
        assert_eq!(content_type_for_ext(Some("mp3")), "audio/mpeg");
        assert_eq!(content_type_for_ext(Some("webm")), "audio/webm");
        assert_eq!(content_type_for_ext(None), "audio/webm");
    }

    #[test]
    fn duration_and_title_flow_through() {
        let info = InfoDump {
            url: Some("https://cdn/top".into()),
            title: Some("Song".into()),
            duration: Some(212.5),
            ..InfoDump::default()
        };
        let stream = resolve_stream(&track(), &info).unwrap();
        assert_eq!(stream.title.as_deref(), Some("Song"));
        assert_eq!(stream.duration, Some(212.5));
    }

    #[test]
    fn info_dump_parses_real_shape() {
        let json = r#"{
            "url": null,
            "title": "Song",
            "duration": 180,
            "formats": [
                {"url": "https://cdn/a", "acodec": "none", "ext": "mp4"},
                {"url": "https://cdn/b", "acodec": "opus", "ext": "webm", "format_id": "251"}
            ],
            "extra_field_we_ignore": {"nested": true}
        }"#;
        let info: InfoDump = serde_json::from_str(json).unwrap();
        assert_eq!(info.formats.len(), 2);
        let stream = resolve_stream(&track(), &info).unwrap();
        assert_eq!(stream.media_url, "https://cdn/b");
        assert_eq!(stream.content_type, "audio/webm");
    }
}

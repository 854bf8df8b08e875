//! Core types for the lyrics transcription pipeline.

use lyra_resolver::TrackRef;
use serde::{Deserialize, Serialize};

/// Fixed lyrics text of the non-persisted in-progress placeholder.
pub const IN_PROGRESS_MESSAGE: &str =
    "Transcription in progress. Check back in a few seconds.";

/// Where a lyrics record came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LyricSource {
    /// Placeholder for a record that is still being produced. Never
    /// written to disk.
    Transcribing,
    /// Final result produced by the whisper engine.
    WhisperAi,
}

/// One timestamped lyric line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LyricSegment {
    /// Offset from the start of the track, in seconds.
    pub start: f64,
    /// Lyric text for this segment.
    pub text: String,
}

/// The transcription result for one track.
///
/// Persisted as one JSON file per track; a record with
/// [`LyricSource::WhisperAi`] is final and never overwritten.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionRecord {
    /// The track this record belongs to.
    pub video_id: TrackRef,
    /// Flat lyrics text (non-empty segment texts joined by newlines).
    pub lyrics: String,
    /// Ordered timestamped segments.
    pub segments: Vec<LyricSegment>,
    /// Whether the segments carry usable timestamps.
    pub synced: bool,
    /// Provenance of this record.
    pub source: LyricSource,
}

impl TranscriptionRecord {
    /// Non-persisted placeholder returned while no durable record exists.
    #[must_use]
    pub fn in_progress(track: TrackRef) -> Self {
        Self {
            video_id: track,
            lyrics: IN_PROGRESS_MESSAGE.to_owned(),
            segments: Vec::new(),
            synced: false,
            source: LyricSource::Transcribing,
        }
    }

    /// Build the final record from raw engine segments.
    ///
    /// Segments whose trimmed text is empty are dropped; the flat
    /// `lyrics` string is the remaining texts joined by newlines.
    #[must_use]
    pub fn from_segments(track: TrackRef, raw: Vec<LyricSegment>) -> Self {
        let segments: Vec<LyricSegment> = raw
            .into_iter()
            .filter_map(|seg| {
                let text = seg.text.trim();
                (!text.is_empty()).then(|| LyricSegment {
                    start: seg.start,
                    text: text.to_owned(),
                })
            })
            .collect();

        let lyrics = segments
            .iter()
            .map(|seg| seg.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            video_id: track,
            lyrics,
            segments,
            synced: true,
            source: LyricSource::WhisperAi,
        }
    }

    /// Whether this record is the final, durable result.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.source == LyricSource::WhisperAi
    }
}

/// Errors that can occur in the transcription pipeline.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    /// The speech model failed to initialize (or is not compiled in).
    #[error("transcription model unavailable: {0}")]
    ModelUnavailable(String),

    /// Fetching or transcoding the track's audio failed.
    #[error("audio download failed: {0}")]
    DownloadFailed(String),

    /// The speech model failed while decoding the audio.
    #[error("transcription failed: {0}")]
    TranscriptionFailed(String),

    /// Reading or writing the durable record failed.
    #[error("lyrics cache error: {0}")]
    Cache(String),

    /// Other I/O error (blob read, directory creation).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extension trait to reduce `.map_err()` boilerplate when wrapping
/// errors into [`TranscriptionError`].
pub trait ResultExt<T> {
    /// Wrap the error as [`TranscriptionError::ModelUnavailable`] with `context` prefix.
    fn model(self, context: &str) -> Result<T, TranscriptionError>;
    /// Wrap the error as [`TranscriptionError::DownloadFailed`] with `context` prefix.
    fn download(self, context: &str) -> Result<T, TranscriptionError>;
    /// Wrap the error as [`TranscriptionError::TranscriptionFailed`] with `context` prefix.
    fn transcription(self, context: &str) -> Result<T, TranscriptionError>;
    /// Wrap the error as [`TranscriptionError::Cache`] with `context` prefix.
    fn cache(self, context: &str) -> Result<T, TranscriptionError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn model(self, context: &str) -> Result<T, TranscriptionError> {
        self.map_err(|e| TranscriptionError::ModelUnavailable(format!("{context}: {e}")))
    }
    fn download(self, context: &str) -> Result<T, TranscriptionError> {
        self.map_err(|e| TranscriptionError::DownloadFailed(format!("{context}: {e}")))
    }
    fn transcription(self, context: &str) -> Result<T, TranscriptionError> {
        self.map_err(|e| TranscriptionError::TranscriptionFailed(format!("{context}: {e}")))
    }
    fn cache(self, context: &str) -> Result<T, TranscriptionError> {
        self.map_err(|e| TranscriptionError::Cache(format!("{context}: {e}")))
    }
}

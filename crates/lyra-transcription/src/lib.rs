//! # lyra-transcription
//!
//! Speech-to-text lyrics for the lyra backend.
//!
//! # Architecture
//!
//! ```text
//! track id → extractor download (m4a blob)
//! → symphonia decode → rubato resample to 16kHz mono f32
//! → whisper.cpp (whisper-rs) → timestamped segments
//! → durable JSON record per track, blob deleted
//! ```
//!
//! The durable record is the sole source of truth: its existence means
//! the track is transcribed, its absence means not-started-or-running.
//! The whisper engine is heavy (native C++ build, model weights), so it
//! sits behind the `whisper` cargo feature; without it the worker still
//! serves cached records and placeholders but fails transcription
//! triggers with `ModelUnavailable`.
//!
//! ## Crate position
//!
//! Depends on: lyra-resolver (audio download).
//! Depended on by: lyra-server.

#![deny(unsafe_code)]

// Always available (no heavy deps)
pub mod cache;
pub mod model;
pub mod speech;
pub mod types;
pub mod worker;

// Feature-gated (require whisper-rs + symphonia + rubato)
#[cfg(feature = "whisper")]
pub(crate) mod audio;
#[cfg(feature = "whisper")]
pub mod engine;

pub use cache::LyricsCache;
pub use speech::{LazyEngine, SpeechEngine};
pub use types::{LyricSegment, LyricSource, ResultExt, TranscriptionError, TranscriptionRecord};
pub use worker::LyricsWorker;

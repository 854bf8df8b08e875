//! Resolver error types.

use thiserror::Error;

/// Errors that can occur while resolving or downloading a track.
///
/// [`ResolveError::NoAudioFound`] is deliberately distinct from
/// [`ResolveError::Extractor`]: the HTTP layer maps the former to 404
/// and everything else to 5xx.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The extractor ran but produced no usable audio format.
    #[error("no audio URL found for track {0}")]
    NoAudioFound(String),

    /// The extractor binary failed to spawn or exited non-zero.
    #[error("extractor failed: {0}")]
    Extractor(String),

    /// The extractor's JSON output could not be parsed.
    #[error("failed to parse extractor output: {0}")]
    Parse(#[from] serde_json::Error),

    /// I/O error talking to the extractor process.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The supplied track identifier is not usable.
    #[error("invalid track identifier: {0}")]
    InvalidTrack(String),
}

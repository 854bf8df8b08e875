//! Engine abstraction and process-wide lazy initialization.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::info;

use crate::types::{LyricSegment, TranscriptionError};

/// A speech-to-text engine producing timestamped segments.
///
/// Implementations are blocking and CPU-bound; callers run them on
/// `spawn_blocking`.
pub trait SpeechEngine: Send + Sync {
    /// Transcribe an encoded audio blob into ordered segments.
    fn transcribe_blob(&self, audio: &[u8]) -> Result<Vec<LyricSegment>, TranscriptionError>;
}

/// Process-wide, lazily-initialized speech engine handle.
///
/// The underlying model is expensive to load, so initialization happens
/// at most once per process: concurrent first callers all await the
/// same `OnceCell` initialization. A failed initialization is not
/// cached, so a later trigger retries from scratch.
pub struct LazyEngine {
    model: String,
    model_dir: PathBuf,
    cell: OnceCell<Arc<dyn SpeechEngine>>,
}

impl LazyEngine {
    /// Create an uninitialized handle for the given model.
    pub fn new(model: impl Into<String>, model_dir: PathBuf) -> Self {
        Self {
            model: model.into(),
            model_dir,
            cell: OnceCell::new(),
        }
    }

    /// Wrap an already-built engine, skipping lazy initialization.
    pub fn preloaded(engine: Arc<dyn SpeechEngine>) -> Self {
        Self {
            model: String::from("preloaded"),
            model_dir: PathBuf::new(),
            cell: OnceCell::new_with(Some(engine)),
        }
    }

    /// Whether the engine has finished initializing.
    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Get the engine, initializing it on first call.
    pub async fn get(&self) -> Result<Arc<dyn SpeechEngine>, TranscriptionError> {
        self.cell
            .get_or_try_init(|| async {
                info!(model = %self.model, "initializing transcription engine");
                self.load().await
            })
            .await
            .cloned()
    }

    #[cfg(feature = "whisper")]
    async fn load(&self) -> Result<Arc<dyn SpeechEngine>, TranscriptionError> {
        let engine =
            crate::engine::WhisperLyricsEngine::load(&self.model, self.model_dir.clone()).await?;
        Ok(engine as Arc<dyn SpeechEngine>)
    }

    #[cfg(not(feature = "whisper"))]
    async fn load(&self) -> Result<Arc<dyn SpeechEngine>, TranscriptionError> {
        Err(TranscriptionError::ModelUnavailable(format!(
            "built without the whisper feature (model {} in {})",
            self.model,
            self.model_dir.display()
        )))
    }
}

//! Whisper-backed speech engine.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio;
use crate::model;
use crate::speech::SpeechEngine;
use crate::types::{LyricSegment, ResultExt, TranscriptionError};

/// whisper.cpp engine producing per-line lyric segments.
pub struct WhisperLyricsEngine {
    ctx: WhisperContext,
}

impl WhisperLyricsEngine {
    /// Load the engine, fetching model weights into `model_dir` first
    /// if they are not already cached there.
    pub async fn load(model: &str, model_dir: PathBuf) -> Result<Arc<Self>, TranscriptionError> {
        let weights = model::ensure_model(&model_dir, model).await?;
        info!(model, path = %weights.display(), "loading whisper model");

        tokio::task::spawn_blocking(move || {
            let path = weights
                .to_str()
                .ok_or_else(|| {
                    TranscriptionError::ModelUnavailable("non-UTF8 model path".into())
                })?;
            let ctx =
                WhisperContext::new_with_params(path, WhisperContextParameters::default())
                    .model("whisper context init")?;
            Ok(Arc::new(Self { ctx }))
        })
        .await
        .model("task join")?
    }
}

impl SpeechEngine for WhisperLyricsEngine {
    fn transcribe_blob(&self, blob: &[u8]) -> Result<Vec<LyricSegment>, TranscriptionError> {
        let samples = audio::pcm_for_model(blob)?;
        debug!(samples = samples.len(), "decoded blob for transcription");

        let mut state = self.ctx.create_state().transcription("whisper state")?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some("auto"));
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state.full(params, &samples).transcription("whisper full")?;

        let n_segments = state.full_n_segments();
        let mut segments = Vec::with_capacity(n_segments as usize);
        for i in 0..n_segments {
            if let Some(seg) = state.get_segment(i) {
                let text = seg.to_str_lossy().transcription("segment text")?;
                segments.push(LyricSegment {
                    start: seg.start_timestamp() as f64 / 100.0,
                    text: text.trim().to_owned(),
                });
            }
        }
        Ok(segments)
    }
}

//! Whisper model file management — path resolution and `HuggingFace`
//! download.

use std::path::{Path, PathBuf};

#[cfg(feature = "whisper")]
use crate::types::{ResultExt, TranscriptionError};
#[cfg(feature = "whisper")]
use tracing::{debug, info};

/// `HuggingFace` repository holding the ggml whisper weights.
#[cfg(feature = "whisper")]
const HF_REPO: &str = "ggerganov/whisper.cpp";

/// Model names we know how to fetch.
pub const KNOWN_MODELS: &[&str] = &[
    "tiny",
    "base",
    "small",
    "medium",
    "large-v3",
    "large-v3-turbo",
];

/// ggml weights filename for a model name (`base` → `ggml-base.bin`).
pub fn model_filename(model: &str) -> String {
    format!("ggml-{model}.bin")
}

/// Full path of a model's weights under `model_dir`.
pub fn model_path(model_dir: impl AsRef<Path>, model: &str) -> PathBuf {
    model_dir.as_ref().join(model_filename(model))
}

/// Check whether a model's weights exist locally.
pub fn is_model_cached(model_dir: impl AsRef<Path>, model: &str) -> bool {
    model_path(model_dir, model).exists()
}

/// Download the model weights from `HuggingFace` if not already cached.
///
/// hf-hub uses sync HTTP, so the download runs on a blocking thread.
#[cfg(feature = "whisper")]
pub async fn ensure_model(
    model_dir: impl AsRef<Path>,
    model: &str,
) -> Result<PathBuf, TranscriptionError> {
    let model_dir = model_dir.as_ref().to_path_buf();
    let target = model_path(&model_dir, model);

    if target.exists() {
        debug!("model weights already cached at {}", target.display());
        return Ok(target);
    }

    if !KNOWN_MODELS.contains(&model) {
        return Err(TranscriptionError::ModelUnavailable(format!(
            "unknown whisper model: {model}"
        )));
    }

    info!(model, "downloading whisper weights from HuggingFace...");
    std::fs::create_dir_all(&model_dir)?;

    let model = model.to_owned();
    tokio::task::spawn_blocking(move || download_model(&model_dir, &model))
        .await
        .model("task join")?
}

#[cfg(feature = "whisper")]
fn download_model(model_dir: &Path, model: &str) -> Result<PathBuf, TranscriptionError> {
    let filename = model_filename(model);
    let target = model_dir.join(&filename);

    let api = hf_hub::api::sync::Api::new().model("HF API init")?;
    let repo = api.model(HF_REPO.to_string());

    let cached_path = repo
        .get(&filename)
        .model(&format!("download {filename}"))?;

    // hf-hub caches to its own dir; copy into ours for a stable layout
    if cached_path != target {
        let _ = std::fs::copy(&cached_path, &target).model(&format!("copy {filename}"))?;
    }

    info!("model weights ready at {}", target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_for_base() {
        assert_eq!(model_filename("base"), "ggml-base.bin");
        assert_eq!(model_filename("large-v3"), "ggml-large-v3.bin");
    }

    #[test]
    fn model_path_joins_dir() {
        assert_eq!(
            model_path("/tmp/models", "base"),
            PathBuf::from("/tmp/models/ggml-base.bin")
        );
    }

    #[test]
    fn not_cached_in_empty_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(!is_model_cached(tmp.path(), "base"));
    }

    #[test]
    fn cached_when_file_exists() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("ggml-base.bin"), b"").unwrap();
        assert!(is_model_cached(tmp.path(), "base"));
        assert!(!is_model_cached(tmp.path(), "small"));
    }

    #[test]
    fn known_models_include_defaults() {
        assert!(KNOWN_MODELS.contains(&"base"));
        assert!(KNOWN_MODELS.contains(&"large-v3"));
    }
}

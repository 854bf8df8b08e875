//! Typed settings for the lyra backend.
//!
//! All structs use camelCase on the wire so the settings file reads the
//! same as the HTTP API payloads.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root settings object.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LyraSettings {
    /// HTTP server settings.
    pub server: ServerSettings,
    /// Directory for durable lyrics records and temporary audio blobs.
    pub cache_dir: String,
    /// Upstream extractor settings.
    pub extractor: ExtractorSettings,
    /// Speech-to-text settings.
    pub transcription: TranscriptionSettings,
}

impl Default for LyraSettings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            cache_dir: "cache".to_string(),
            extractor: ExtractorSettings::default(),
            transcription: TranscriptionSettings::default(),
        }
    }
}

impl LyraSettings {
    /// Resolve `cache_dir` to an absolute path (relative values live
    /// under `~/.lyra`).
    pub fn cache_path(&self) -> PathBuf {
        resolve_under_home(&self.cache_dir)
    }
}

/// Server network settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// HTTP port.
    pub port: u16,
    /// Frontend base URL, used for share-link generation.
    pub frontend_url: String,
    /// Upstream connection-establishment timeout for the stream proxy,
    /// in seconds.
    pub upstream_connect_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            frontend_url: "http://localhost:5173".to_string(),
            upstream_connect_timeout_secs: 30,
        }
    }
}

/// Upstream extractor (yt-dlp) settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractorSettings {
    /// Extractor binary name or path.
    pub bin: String,
    /// Maximum catalog search results per query.
    pub search_limit: usize,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            bin: "yt-dlp".to_string(),
            search_limit: 20,
        }
    }
}

/// Speech-to-text settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranscriptionSettings {
    /// Whisper model name (e.g. `"base"`, `"small"`, `"large-v3"`).
    pub model: String,
    /// Directory holding model weights (relative values live under
    /// `~/.lyra`).
    pub model_dir: String,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "base".to_string(),
            model_dir: "models".to_string(),
        }
    }
}

impl TranscriptionSettings {
    /// Resolve `model_dir` to an absolute path.
    pub fn model_path(&self) -> PathBuf {
        resolve_under_home(&self.model_dir)
    }
}

/// Resolve a possibly-relative path under `~/.lyra`.
fn resolve_under_home(value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() {
        return path;
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".lyra").join(path)
}

//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`LyraSettings::default()`]
//! 2. If `~/.lyra/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::LyraSettings;

/// Resolve the path to the settings file (`~/.lyra/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".lyra").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<LyraSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<LyraSettings> {
    let defaults = serde_json::to_value(LyraSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: LyraSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Each env var has strict parsing rules; invalid values are logged and
/// ignored (falling back to file/default).
pub fn apply_env_overrides(settings: &mut LyraSettings) {
    if let Some(v) = read_env_u16("LYRA_PORT", 1, 65535) {
        settings.server.port = v;
    }
    // PORT is honored for hosting platforms that inject it; LYRA_PORT wins if both set.
    if std::env::var("LYRA_PORT").is_err() {
        if let Some(v) = read_env_u16("PORT", 1, 65535) {
            settings.server.port = v;
        }
    }
    if let Some(v) = read_env_string("LYRA_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = read_env_string("LYRA_FRONTEND_URL") {
        settings.server.frontend_url = v;
    }
    if let Some(v) = read_env_u64("LYRA_UPSTREAM_CONNECT_TIMEOUT", 1, 600) {
        settings.server.upstream_connect_timeout_secs = v;
    }
    if let Some(v) = read_env_string("LYRA_CACHE_DIR") {
        settings.cache_dir = v;
    }
    if let Some(v) = read_env_string("LYRA_YTDLP_BIN") {
        settings.extractor.bin = v;
    }
    if let Some(v) = read_env_usize("LYRA_SEARCH_LIMIT", 1, 100) {
        settings.extractor.search_limit = v;
    }
    if let Some(v) = read_env_string("LYRA_WHISPER_MODEL") {
        settings.transcription.model = v;
    }
    if let Some(v) = read_env_string("LYRA_MODEL_DIR") {
        settings.transcription.model_dir = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a `u16` within a range.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u16(name: &str, min: u16, max: u16) -> Option<u16> {
    let val = std::env::var(name).ok()?;
    let result = parse_u16_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u16 env var, ignoring");
    }
    result
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    let result = parse_usize_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid usize env var, ignoring");
    }
    result
}

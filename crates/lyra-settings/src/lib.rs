//! # lyra-settings
//!
//! Configuration management with layered sources for the lyra backend.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`LyraSettings::default()`]
//! 2. **User file** — `~/.lyra/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `LYRA_*` overrides (highest priority)
//!
//! CLI flags (parsed in the binary) override everything above for the
//! handful of values they cover.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::*;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

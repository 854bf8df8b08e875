//! Extractor subprocess wrapper.
//!
//! All upstream access goes through the extractor binary (yt-dlp). Each
//! call spawns a short-lived process with `tokio::process::Command` and
//! captures its JSON output; nothing is cached between calls.

use std::path::Path;
use std::process::Stdio;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::errors::ResolveError;
use crate::formats::{resolve_stream, InfoDump, ResolvedStream};
use crate::track::TrackRef;

/// Format selector asked of the extractor: prefer m4a, then webm,
/// then any best audio.
const FORMAT_SELECTOR: &str = "bestaudio[ext=m4a]/bestaudio[ext=webm]/bestaudio/best";

/// One entry of a flat catalog search dump.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SearchEntry {
    /// Upstream track identifier.
    pub id: Option<String>,
    /// Track title.
    pub title: Option<String>,
    /// Channel name, when present.
    pub channel: Option<String>,
    /// Uploader name (fallback for channel).
    pub uploader: Option<String>,
    /// Duration in seconds.
    pub duration: Option<f64>,
}

impl SearchEntry {
    /// Best available artist name for this entry.
    #[must_use]
    pub fn artist(&self) -> Option<&str> {
        self.channel.as_deref().or(self.uploader.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct SearchDump {
    #[serde(default)]
    entries: Vec<SearchEntry>,
}

/// Handle to the extractor binary.
#[derive(Clone, Debug)]
pub struct Extractor {
    bin: String,
}

impl Extractor {
    /// Create an extractor using the given binary name or path.
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Resolve a track to a live audio stream.
    ///
    /// Queries all available formats and applies the selection policy.
    /// The result is time-limited and must not be cached.
    pub async fn resolve(&self, track: &TrackRef) -> Result<ResolvedStream, ResolveError> {
        let info = self.probe(track).await?;
        resolve_stream(track, &info)
    }

    /// Fetch the raw info dump for a track.
    pub async fn probe(&self, track: &TrackRef) -> Result<InfoDump, ResolveError> {
        let url = track.watch_url();
        let stdout = self
            .run(&["-J", "--no-warnings", "-f", FORMAT_SELECTOR, &url])
            .await?;
        Ok(serde_json::from_slice(&stdout)?)
    }

    /// Search the upstream catalog, returning up to `limit` entries.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchEntry>, ResolveError> {
        let selector = format!("ytsearch{limit}:{query}");
        let stdout = self
            .run(&["-J", "--no-warnings", "--flat-playlist", &selector])
            .await?;
        let dump: SearchDump = serde_json::from_slice(&stdout)?;
        Ok(dump.entries)
    }

    /// Download and transcode a track's best audio to `dest` (m4a).
    ///
    /// Used by the transcription worker; never by the streaming path.
    pub async fn download_audio(&self, track: &TrackRef, dest: &Path) -> Result<(), ResolveError> {
        let url = track.watch_url();
        let dest_str = dest.to_string_lossy().into_owned();
        let _ = self
            .run(&[
                "--no-warnings",
                "-f",
                "bestaudio",
                "-x",
                "--audio-format",
                "m4a",
                "-o",
                &dest_str,
                &url,
            ])
            .await?;

        if !dest.exists() {
            return Err(ResolveError::Extractor(format!(
                "download produced no file at {dest_str}"
            )));
        }
        Ok(())
    }

    /// Spawn the extractor with `args` and return its stdout.
    async fn run(&self, args: &[&str]) -> Result<Vec<u8>, ResolveError> {
        debug!(bin = %self.bin, ?args, "spawning extractor");

        let output = tokio::process::Command::new(&self.bin)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ResolveError::Extractor(format!("failed to spawn {}: {e}", self.bin)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail = stderr_tail(&stderr);
            warn!(bin = %self.bin, code = ?output.status.code(), %tail, "extractor failed");
            return Err(ResolveError::Extractor(format!(
                "{} exited with {:?}: {tail}",
                self.bin,
                output.status.code()
            )));
        }

        Ok(output.stdout)
    }
}

/// Last few hundred characters of stderr, enough to carry the real error.
fn stderr_tail(stderr: &str) -> String {
    let trimmed = stderr.trim();
    let start = trimmed
        .char_indices()
        .rev()
        .take(400)
        .last()
        .map_or(0, |(i, _)| i);
    trimmed[start..].to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    /// Write an executable stub script that prints `body` on stdout.
    fn stub_bin(dir: &Path, body: &str) -> String {
        let path = dir.join("fake-ytdlp");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh\ncat <<'EOF'\n{body}\nEOF").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn track() -> TrackRef {
        TrackRef::parse("abc123").unwrap()
    }

    #[tokio::test]
    async fn probe_parses_stub_output() {
        let tmp = tempfile::tempdir().unwrap();
        let bin = stub_bin(
            tmp.path(),
            r#"{"url": "https://cdn/audio", "title": "Song", "duration": 100}"#,
        );
        let extractor = Extractor::new(bin);
        let info = extractor.probe(&track()).await.unwrap();
        assert_eq!(info.url.as_deref(), Some("https://cdn/audio"));
        assert_eq!(info.title.as_deref(), Some("Song"));
    }

    #[tokio::test]
    async fn resolve_applies_selection_policy() {
        let tmp = tempfile::tempdir().unwrap();
        let bin = stub_bin(
            tmp.path(),
            r#"{"formats": [{"url": "https://cdn/a", "acodec": "opus", "ext": "webm"}]}"#,
        );
        let extractor = Extractor::new(bin);
        let stream = extractor.resolve(&track()).await.unwrap();
        assert_eq!(stream.media_url, "https://cdn/a");
        assert_eq!(stream.content_type, "audio/webm");
    }

    #[tokio::test]
    async fn resolve_no_audio_is_distinct_error() {
        let tmp = tempfile::tempdir().unwrap();
        let bin = stub_bin(tmp.path(), r#"{"title": "no formats here"}"#);
        let extractor = Extractor::new(bin);
        let err = extractor.resolve(&track()).await.unwrap_err();
        assert!(matches!(err, ResolveError::NoAudioFound(_)));
    }

    #[tokio::test]
    async fn missing_binary_is_extractor_error() {
        let extractor = Extractor::new("/nonexistent/yt-dlp-missing");
        let err = extractor.probe(&track()).await.unwrap_err();
        assert!(matches!(err, ResolveError::Extractor(_)));
    }

    #[tokio::test]
    async fn nonzero_exit_is_extractor_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("fail-bin");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh\necho 'ERROR: video unavailable' >&2\nexit 1").unwrap();
        drop(file);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let extractor = Extractor::new(path.to_string_lossy().into_owned());
        let err = extractor.probe(&track()).await.unwrap_err();
        assert!(matches!(err, ResolveError::Extractor(msg) if msg.contains("unavailable")));
    }

    #[tokio::test]
    async fn search_parses_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let bin = stub_bin(
            tmp.path(),
            r#"{"entries": [{"id": "v1", "title": "One", "channel": "Artist", "duration": 60}]}"#,
        );
        let extractor = Extractor::new(bin);
        let entries = extractor.search("one", 20).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id.as_deref(), Some("v1"));
        assert_eq!(entries[0].artist(), Some("Artist"));
    }

    #[tokio::test]
    async fn search_missing_entries_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let bin = stub_bin(tmp.path(), "{}");
        let extractor = Extractor::new(bin);
        let entries = extractor.search("nothing", 5).await.unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn artist_falls_back_to_uploader() {
        let entry = SearchEntry {
            uploader: Some("Uploader".into()),
            ..SearchEntry::default()
        };
        assert_eq!(entry.artist(), Some("Uploader"));
    }

    #[test]
    fn stderr_tail_truncates() {
        let long = "x".repeat(1000);
        assert_eq!(stderr_tail(&long).len(), 400);
        assert_eq!(stderr_tail("short"), "short");
    }
}

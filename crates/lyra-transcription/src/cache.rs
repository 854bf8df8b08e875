//! Durable one-file-per-track lyrics storage.
//!
//! Each track owns two paths under the cache directory: a JSON record
//! (`<id>.json`) that is only ever written atomically, and a transient
//! audio blob (`<id>.m4a`) that exists while a transcription job runs.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use lyra_resolver::TrackRef;

use crate::types::{ResultExt, TranscriptionError, TranscriptionRecord};

/// Filesystem-backed store for transcription records and working blobs.
pub struct LyricsCache {
    dir: PathBuf,
}

impl LyricsCache {
    /// Open the cache rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, TranscriptionError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .cache(&format!("create cache dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Directory the cache lives in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the persistent record for `track`.
    pub fn record_path(&self, track: &TrackRef) -> PathBuf {
        self.dir.join(format!("{}.json", track.as_str()))
    }

    /// Path of the transient audio blob for `track`.
    pub fn blob_path(&self, track: &TrackRef) -> PathBuf {
        self.dir.join(format!("{}.m4a", track.as_str()))
    }

    /// Load the stored record for `track`, if one exists.
    ///
    /// A record that exists but cannot be parsed is a cache error, not
    /// a miss: callers should surface it rather than silently redo work.
    pub async fn load(
        &self,
        track: &TrackRef,
    ) -> Result<Option<TranscriptionRecord>, TranscriptionError> {
        let path = self.record_path(track);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).cache(&format!("read {}", path.display())),
        };
        let record: TranscriptionRecord =
            serde_json::from_slice(&bytes).cache(&format!("parse {}", path.display()))?;
        Ok(Some(record))
    }

    /// Persist `record` atomically: write a sibling temp file, then
    /// rename it over the final path. Readers never observe a partial
    /// record.
    pub async fn store(&self, record: &TranscriptionRecord) -> Result<(), TranscriptionError> {
        let path = self.record_path(&record.video_id);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(record).cache("serialize record")?;
        fs::write(&tmp, &bytes)
            .await
            .cache(&format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .await
            .cache(&format!("rename {} -> {}", tmp.display(), path.display()))?;
        debug!(track = %record.video_id, path = %path.display(), "stored transcription record");
        Ok(())
    }

    /// Delete the working blob for `track`, if present. Failures are
    /// logged and swallowed; blob cleanup must never mask a job result.
    pub async fn remove_blob(&self, track: &TrackRef) {
        let path = self.blob_path(track);
        match fs::remove_file(&path).await {
            Ok(()) => debug!(track = %track, "removed audio blob"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(track = %track, error = %e, "failed to remove audio blob"),
        }
    }
}

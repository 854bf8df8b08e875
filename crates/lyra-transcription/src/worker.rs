//! The transcription job pipeline.
//!
//! A job downloads the track's audio, runs the speech engine over it,
//! persists the finished record, and cleans up the working blob. Jobs
//! are memoized per track: concurrent triggers for the same track
//! serialize on an in-flight guard and all but the first find the
//! finished record in the cache.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};

use lyra_resolver::{Extractor, TrackRef};

use crate::cache::LyricsCache;
use crate::speech::LazyEngine;
use crate::types::{ResultExt, TranscriptionError, TranscriptionRecord};

/// Downloads, transcribes, and persists lyrics for tracks.
pub struct LyricsWorker {
    extractor: Arc<Extractor>,
    cache: Arc<LyricsCache>,
    engine: LazyEngine,
    inflight: DashMap<String, Arc<Mutex<()>>>,
}

impl LyricsWorker {
    pub fn new(extractor: Arc<Extractor>, cache: Arc<LyricsCache>, engine: LazyEngine) -> Self {
        Self {
            extractor,
            cache,
            engine,
            inflight: DashMap::new(),
        }
    }

    /// Access the backing record store.
    pub fn cache(&self) -> &LyricsCache {
        &self.cache
    }

    /// Whether the speech engine has been initialized.
    pub fn engine_loaded(&self) -> bool {
        self.engine.is_loaded()
    }

    /// Initialize the speech engine ahead of the first job.
    pub async fn warm_engine(&self) -> Result<(), TranscriptionError> {
        let _ = self.engine.get().await?;
        Ok(())
    }

    /// What a reader sees right now: the stored record if one exists,
    /// otherwise an in-progress placeholder. Never touches disk beyond
    /// the read.
    pub async fn current(
        &self,
        track: &TrackRef,
    ) -> Result<TranscriptionRecord, TranscriptionError> {
        match self.cache.load(track).await? {
            Some(record) => Ok(record),
            None => Ok(TranscriptionRecord::in_progress(track.clone())),
        }
    }

    /// Run transcription for `track`, or return the already-finished
    /// record. Safe to call repeatedly and concurrently: one job runs
    /// per track at a time, and a finished record short-circuits.
    pub async fn transcribe(
        &self,
        track: &TrackRef,
    ) -> Result<TranscriptionRecord, TranscriptionError> {
        if let Some(record) = self.cache.load(track).await? {
            if record.is_final() {
                return Ok(record);
            }
        }

        let guard = self
            .inflight
            .entry(track.as_str().to_owned())
            .or_default()
            .clone();
        let held = guard.lock().await;

        // A concurrent job may have finished while we waited for the lock
        let result = match self.cache.load(track).await? {
            Some(record) if record.is_final() => Ok(record),
            _ => {
                let result = self.run_job(track).await;

                // The blob is scratch space: gone on success and on failure alike
                self.cache.remove_blob(track).await;

                match &result {
                    Ok(record) => {
                        info!(track = %track, segments = record.segments.len(), "transcription finished");
                    }
                    Err(e) => warn!(track = %track, error = %e, "transcription failed"),
                }
                result
            }
        };

        drop(held);
        drop(guard);
        self.release(track);
        result
    }

    async fn run_job(&self, track: &TrackRef) -> Result<TranscriptionRecord, TranscriptionError> {
        let blob = self.blob_for(track).await?;

        let engine = self.engine.get().await?;

        let audio = tokio::fs::read(&blob)
            .await
            .transcription("read audio blob")?;
        let segments = tokio::task::spawn_blocking(move || engine.transcribe_blob(&audio))
            .await
            .transcription("task join")??;

        let record = TranscriptionRecord::from_segments(track.clone(), segments);
        self.cache.store(&record).await?;
        Ok(record)
    }

    /// Ensure the audio blob for `track` exists, downloading it if not.
    async fn blob_for(&self, track: &TrackRef) -> Result<PathBuf, TranscriptionError> {
        let blob = self.cache.blob_path(track);
        if blob.exists() {
            return Ok(blob);
        }
        info!(track = %track, "downloading audio for transcription");
        self.extractor
            .download_audio(track, &blob)
            .await
            .download("audio download")?;
        Ok(blob)
    }

    /// Drop the in-flight entry for `track` unless other triggers still
    /// hold it. A contended entry stays in the map so late waiters and
    /// new arrivals serialize on the same lock.
    fn release(&self, track: &TrackRef) {
        let _ = self
            .inflight
            .remove_if(track.as_str(), |_, entry| Arc::strong_count(entry) == 1);
    }
}

//! Shared request-handler state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use lyra_resolver::Extractor;
use lyra_transcription::LyricsWorker;

/// State accessible from every Axum handler.
#[derive(Clone)]
pub struct AppState {
    /// The yt-dlp frontend for resolution, search, and downloads.
    pub extractor: Arc<Extractor>,
    /// Transcription pipeline and record store.
    pub worker: Arc<LyricsWorker>,
    /// Shared client for upstream media and thumbnail requests.
    pub http: reqwest::Client,
    /// When the server started.
    pub start_time: Instant,
    /// Maximum catalog search results.
    pub search_limit: usize,
}

impl AppState {
    /// Build the state, including the shared upstream HTTP client.
    pub fn new(
        extractor: Arc<Extractor>,
        worker: Arc<LyricsWorker>,
        upstream_connect_timeout: Duration,
        search_limit: usize,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(upstream_connect_timeout)
            .build()?;
        Ok(Self {
            extractor,
            worker,
            http,
            start_time: Instant::now(),
            search_limit,
        })
    }
}

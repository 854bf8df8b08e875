//! # lyra-backend
//!
//! Music backend binary — wires together all crates and starts the
//! HTTP server.

#![deny(unsafe_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lyra_resolver::Extractor;
use lyra_server::config::ServerConfig;
use lyra_server::server::LyraServer;
use lyra_server::state::AppState;
use lyra_transcription::{LazyEngine, LyricsCache, LyricsWorker};

/// lyra music backend server.
#[derive(Parser, Debug)]
#[command(name = "lyra-backend", about = "lyra music backend server")]
struct Cli {
    /// Host to bind (overrides settings if specified).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings if specified).
    #[arg(long)]
    port: Option<u16>,

    /// Cache directory for transcription records (overrides settings).
    #[arg(long)]
    cache_dir: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings_path = lyra_settings::loader::settings_path();
    let settings =
        lyra_settings::loader::load_settings_from_path(&settings_path).unwrap_or_default();

    let mut config = ServerConfig::from_settings(&settings);
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let cache_dir = args.cache_dir.unwrap_or_else(|| settings.cache_path());
    let model_dir = settings.transcription.model_path();

    let extractor = Arc::new(Extractor::new(settings.extractor.bin.clone()));
    let cache = Arc::new(
        LyricsCache::open(&cache_dir)
            .await
            .context("Failed to open lyrics cache")?,
    );
    let engine = LazyEngine::new(settings.transcription.model.clone(), model_dir.clone());
    let worker = Arc::new(LyricsWorker::new(extractor.clone(), cache, engine));

    // Warm the speech engine at startup when the weights are already on
    // disk; a cold first transcription otherwise pays the model load too
    if lyra_transcription::model::is_model_cached(&model_dir, &settings.transcription.model) {
        tracing::info!("transcription model cached — warming engine");
        let warm = worker.clone();
        drop(tokio::spawn(async move {
            if let Err(e) = warm.warm_engine().await {
                tracing::warn!(error = %e, "engine warm-up failed");
            }
        }));
    }

    let state = AppState::new(
        extractor,
        worker,
        Duration::from_secs(config.upstream_connect_timeout_secs),
        config.search_limit,
    )
    .context("Failed to build HTTP client")?;

    let server = LyraServer::new(config, state);
    let _signal = server.shutdown().spawn_signal_listener();

    tracing::info!(
        cache_dir = %cache_dir.display(),
        extractor = %settings.extractor.bin,
        model = %settings.transcription.model,
        "starting lyra backend"
    );
    server.run().await.context("Server error")?;
    tracing::info!("server stopped");
    Ok(())
}

//! `LyraServer` — router assembly and the serve loop.

use std::sync::Arc;

use axum::Router;
use tracing::info;

use crate::config::ServerConfig;
use crate::routes;
use crate::shutdown::ShutdownCoordinator;
use crate::state::AppState;

/// The lyra HTTP server.
pub struct LyraServer {
    config: ServerConfig,
    state: AppState,
    shutdown: Arc<ShutdownCoordinator>,
}

impl LyraServer {
    /// Create a new server over prepared state.
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state,
            shutdown: Arc::new(ShutdownCoordinator::new()),
        }
    }

    /// Build the Axum router with all routes.
    pub fn router(&self) -> Router {
        routes::router(self.state.clone(), &self.config.frontend_url)
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind and serve until the shutdown token fires.
    pub async fn run(&self) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr()).await?;
        let addr = listener.local_addr()?;
        info!(%addr, "listening");

        let token = self.shutdown.token();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { token.cancelled().await })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use lyra_resolver::Extractor;
    use lyra_transcription::{LazyEngine, LyricsCache, LyricsWorker};

    async fn make_server(dir: &std::path::Path) -> LyraServer {
        let extractor = Arc::new(Extractor::new("yt-dlp"));
        let cache = Arc::new(LyricsCache::open(dir.join("lyrics")).await.unwrap());
        let worker = Arc::new(LyricsWorker::new(
            extractor.clone(),
            cache,
            LazyEngine::new("base", dir.join("models")),
        ));
        let state =
            AppState::new(extractor, worker, Duration::from_secs(30), 20).unwrap();
        LyraServer::new(ServerConfig::default(), state)
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let server = make_server(tmp.path()).await;
        let app = server.router();

        let req = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 10_000).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["service"], "lyra-backend");
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let tmp = tempfile::tempdir().unwrap();
        let server = make_server(tmp.path()).await;
        let req = Request::builder()
            .uri("/nonexistent")
            .body(Body::empty())
            .unwrap();
        let resp = server.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_without_query_is_400() {
        let tmp = tempfile::tempdir().unwrap();
        let server = make_server(tmp.path()).await;
        let req = Request::builder()
            .uri("/api/search")
            .body(Body::empty())
            .unwrap();
        let resp = server.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_track_id_is_400() {
        let tmp = tempfile::tempdir().unwrap();
        let server = make_server(tmp.path()).await;
        let req = Request::builder()
            .uri("/api/lyrics/..")
            .body(Body::empty())
            .unwrap();
        let resp = server.router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn shutdown_coordinator_accessible() {
        let tmp = tempfile::tempdir().unwrap();
        let server = make_server(tmp.path()).await;
        assert!(!server.shutdown().is_shutting_down());
        server.shutdown().shutdown();
        assert!(server.shutdown().is_shutting_down());
    }
}

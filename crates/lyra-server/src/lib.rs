//! # lyra-server
//!
//! Axum HTTP server for the lyra music backend.
//!
//! - Streaming path: `/api/stream/{id}` resolves a fresh upstream media
//!   URL per request and proxies it with byte-range semantics intact
//! - Transcription path: `/api/lyrics/{id}` reads the durable record,
//!   `/api/lyrics/{id}/transcribe` triggers the worker
//! - Catalog: `/api/search`, `/api/track/{id}`, `/api/thumbnail/{id}`
//! - Graceful shutdown via `tokio::signal` + `CancellationToken`

#![deny(unsafe_code)]

pub mod config;
pub mod errors;
pub mod routes;
pub mod server;
pub mod shutdown;
pub mod state;

pub use config::ServerConfig;
pub use errors::ApiError;
pub use server::LyraServer;
pub use shutdown::ShutdownCoordinator;
pub use state::AppState;

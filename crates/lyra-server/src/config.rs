//! Server configuration.

use serde::{Deserialize, Serialize};

use lyra_settings::LyraSettings;

/// Configuration for the lyra HTTP server.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind (default `"0.0.0.0"`).
    pub host: String,
    /// Port to bind (default `5001`, `0` for auto-assign).
    pub port: u16,
    /// Origin allowed by CORS (the web player).
    pub frontend_url: String,
    /// Connect-phase timeout for upstream media fetches, in seconds.
    pub upstream_connect_timeout_secs: u64,
    /// Maximum results returned by catalog search.
    pub search_limit: usize,
}

impl ServerConfig {
    /// Derive the server config from loaded settings.
    pub fn from_settings(settings: &LyraSettings) -> Self {
        Self {
            host: settings.server.host.clone(),
            port: settings.server.port,
            frontend_url: settings.server.frontend_url.clone(),
            upstream_connect_timeout_secs: settings.server.upstream_connect_timeout_secs,
            search_limit: settings.extractor.search_limit,
        }
    }

    /// The `host:port` string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_settings(&LyraSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_all_interfaces() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 5001);
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        let cfg = ServerConfig {
            host: "127.0.0.1".into(),
            port: 9090,
            ..ServerConfig::default()
        };
        assert_eq!(cfg.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn follows_settings() {
        let mut settings = LyraSettings::default();
        settings.server.port = 4000;
        settings.extractor.search_limit = 5;
        let cfg = ServerConfig::from_settings(&settings);
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.search_limit, 5);
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = ServerConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: ServerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.host, cfg.host);
        assert_eq!(back.port, cfg.port);
        assert_eq!(back.search_limit, cfg.search_limit);
    }
}

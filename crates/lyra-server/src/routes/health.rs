//! `/api/health` endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server is running.
    pub status: String,
    /// Service identifier for multi-service deployments.
    pub service: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    /// Whether the speech engine has finished loading.
    pub engine_loaded: bool,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        service: "lyra-backend".into(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        engine_loaded: state.worker.engine_loaded(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialization() {
        let resp = HealthResponse {
            status: "ok".into(),
            service: "lyra-backend".into(),
            uptime_secs: 3,
            engine_loaded: false,
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&resp).unwrap()).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["service"], "lyra-backend");
        assert_eq!(parsed["uptime_secs"], 3);
        assert_eq!(parsed["engine_loaded"], false);
    }
}

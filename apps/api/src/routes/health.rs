use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resumespark-api"
    }))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub llm_reachable: Option<bool>,
    pub models: Vec<String>,
    pub fallback_match_percentage: u8,
    pub max_upload_bytes: usize,
}

/// GET /api/v1/status
/// Debug view of the LLM wiring and upload limits.
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        llm_reachable: state.llm_reachable,
        models: state.generator.models(),
        fallback_match_percentage: state.config.fallback_match_percentage,
        max_upload_bytes: state.config.max_upload_bytes,
    })
}

use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Gemini in production; swapped for a stub in router tests.
    pub generator: Arc<dyn TextGenerator>,
    /// Result of the startup connectivity check, `None` when it was skipped.
    pub llm_reachable: Option<bool>,
}

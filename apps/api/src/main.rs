mod analysis;
mod config;
mod errors;
mod llm_client;
mod pdf;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{LlmClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing GOOGLE_API_KEY)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_PKG_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeSpark API v{}", env!("CARGO_PKG_VERSION"));

    let llm = LlmClient::new(
        config.google_api_key.clone(),
        config.gemini_api_base.clone(),
        config.gemini_models.clone(),
    )?;
    info!("LLM client initialized (models: {})", config.gemini_models.join(", "));

    let llm_reachable = if config.startup_connectivity_check {
        let reachable = llm.ping().await;
        if reachable {
            info!("Gemini connectivity check passed");
        } else {
            warn!("Gemini connectivity check failed; analyses will likely fail until the key or quota is fixed");
        }
        Some(reachable)
    } else {
        None
    };

    let state = AppState {
        config: config.clone(),
        generator: Arc::new(llm),
        llm_reachable,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

mod config;
mod errors;
mod llm_client;
mod routes;
mod state;
mod synthesis;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::synthesis::orchestrator::{Synthesizer, FALLBACK_MODEL, PRIMARY_MODEL};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Dexter API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the model client once; every request shares it through the synthesizer
    let gemini = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_api_base.clone(),
        Duration::from_secs(config.llm_timeout_secs),
    )?;
    info!("Gemini client initialized (primary: {PRIMARY_MODEL}, fallback: {FALLBACK_MODEL})");

    let state = AppState {
        synthesizer: Arc::new(Synthesizer::new(Arc::new(gemini))),
        config: config.clone(),
    };

    // The page is served from a different origin
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!(
        "Listening on {addr} (upload limit {} bytes)",
        config.max_upload_bytes
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

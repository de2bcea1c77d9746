mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod optimization;
mod routes;
mod sanitizer;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::pdf::PdfExtractLoader;
use crate::extraction::{DocumentExtractor, RendererProvider};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::session::workflow::Workspace;
use crate::state::AppState;

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

    info!("Starting CV Optimizer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize completion client
    let llm = LlmClient::new(config.completion_api_url.clone());
    info!(
        "Completion client initialized (model: {}, endpoint: {})",
        config.completion_model,
        llm.api_url()
    );

    // Page renderer loads on first upload, not here
    let extractor = Arc::new(DocumentExtractor::new(RendererProvider::new(Arc::new(
        PdfExtractLoader,
    ))));

    let state = AppState {
        llm,
        config: config.clone(),
        extractor,
        workspace: Arc::new(Mutex::new(Workspace::new())),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::extraction::DocumentExtractor;
use crate::llm_client::LlmClient;
use crate::session::workflow::Workspace;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub config: Config,
    /// Owns the lazily loaded page renderer.
    pub extractor: Arc<DocumentExtractor>,
    /// The single workspace. Never locked across extraction or a service call.
    pub workspace: Arc<Mutex<Workspace>>,
}

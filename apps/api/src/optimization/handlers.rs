//! Axum route handlers for upload and optimization.

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::document::{PlainText, SourceDocument, TargetDescription};
use crate::optimization::pipeline::optimize;
use crate::session::handlers::DocumentView;
use crate::sanitizer::SanitizedDocument;
use crate::session::workflow::{Stage, Workspace};
use crate::state::AppState;

/// Multipart field carrying the uploaded document.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub stage: Stage,
    pub characters: usize,
    pub text: PlainText,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub target_description: String,
}

/// POST /api/v1/documents
///
/// Extracts text from the uploaded PDF and makes it the workspace's current document.
/// A failed extraction leaves the workspace untouched.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let source = read_file_field(&mut multipart).await?;
    info!(
        "Received upload: {} bytes, declared '{}'",
        source.bytes.len(),
        source.media_type
    );

    let text = state.extractor.extract(&source).await?;

    let mut workspace = state.workspace.lock().await;
    workspace.accept_extraction(text.clone())?;

    Ok(Json(UploadResponse {
        stage: workspace.stage(),
        characters: text.char_count(),
        text,
    }))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<SourceDocument, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let media_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
        return Ok(SourceDocument::new(bytes, media_type));
    }

    Err(AppError::BadRequest(format!(
        "Multipart field '{FILE_FIELD}' is required"
    )))
}

/// POST /api/v1/optimize
///
/// Runs compose → complete → sanitize on the current document. Rejected with 409
/// while another optimization is in flight.
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<DocumentView>, AppError> {
    let target = TargetDescription::new(request.target_description);
    let plain_text = state
        .workspace
        .lock()
        .await
        .begin_optimization(target.clone())?;

    let llm = state.llm.clone();
    let completion = state.config.completion_config();
    let pipeline = async move { optimize(&llm, &completion, &plain_text, &target).await };

    let view = run_optimization(Arc::clone(&state.workspace), pipeline).await?;
    Ok(Json(view))
}

/// Runs `pipeline` in its own task and settles the workspace with its outcome.
///
/// Settling happens in a detached task, so the in-flight flag is cleared even if
/// the client disconnects. A panicking pipeline settles as an internal error.
pub(crate) async fn run_optimization<F>(
    workspace: Arc<Mutex<Workspace>>,
    pipeline: F,
) -> Result<DocumentView, AppError>
where
    F: Future<Output = Result<SanitizedDocument, AppError>> + Send + 'static,
{
    tokio::spawn(async move {
        let result = tokio::spawn(pipeline).await.unwrap_or_else(|e| {
            error!("Optimization task failed: {e}");
            Err(AppError::Internal(anyhow::anyhow!("optimization task failed: {e}")))
        });

        let mut workspace = workspace.lock().await;
        workspace.finish_optimization(result)?;
        Ok::<_, AppError>(DocumentView::from_workspace(&workspace))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("optimization task failed: {e}")))?
}

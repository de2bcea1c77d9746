//! Axum route handlers for reviewing, editing and downloading the optimized document.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::session::workflow::{Stage, Workspace};
use crate::session::{EditMode, EditSession, SessionError};
use crate::state::AppState;

/// Fixed name of the downloaded artifact.
pub const DOWNLOAD_FILE_NAME: &str = "optimized_cv.txt";

#[derive(Debug, Serialize)]
pub struct DocumentView {
    pub stage: Stage,
    pub optimizing: bool,
    pub document_characters: Option<usize>,
    pub target_description: Option<String>,
    pub mode: Option<EditMode>,
    pub canonical: Option<String>,
    pub draft: Option<String>,
}

impl DocumentView {
    pub fn from_workspace(workspace: &Workspace) -> Self {
        let session = workspace.session();
        Self {
            stage: workspace.stage(),
            optimizing: workspace.is_optimizing(),
            document_characters: workspace.plain_text().map(|t| t.char_count()),
            target_description: workspace.target().map(|t| t.as_str().to_string()),
            mode: session.map(EditSession::mode),
            canonical: session.map(|s| s.canonical().as_str().to_string()),
            draft: session
                .filter(|s| s.mode() == EditMode::Editing)
                .map(|s| s.draft().to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub text: String,
}

/// Applies one session transition and returns the resulting view.
async fn transition(
    state: &AppState,
    apply: impl FnOnce(&mut EditSession) -> Result<(), SessionError>,
) -> Result<Json<DocumentView>, AppError> {
    let mut workspace = state.workspace.lock().await;
    apply(workspace.session_mut()?)?;
    Ok(Json(DocumentView::from_workspace(&workspace)))
}

/// GET /api/v1/document
pub async fn handle_get_document(State(state): State<AppState>) -> Json<DocumentView> {
    let workspace = state.workspace.lock().await;
    Json(DocumentView::from_workspace(&workspace))
}

/// POST /api/v1/document/edit
pub async fn handle_begin_edit(
    State(state): State<AppState>,
) -> Result<Json<DocumentView>, AppError> {
    transition(&state, EditSession::begin_edit).await
}

/// PUT /api/v1/document/draft
pub async fn handle_update_draft(
    State(state): State<AppState>,
    Json(request): Json<DraftRequest>,
) -> Result<Json<DocumentView>, AppError> {
    transition(&state, |session| session.update_draft(request.text)).await
}

/// POST /api/v1/document/save
pub async fn handle_save(State(state): State<AppState>) -> Result<Json<DocumentView>, AppError> {
    transition(&state, EditSession::save).await
}

/// POST /api/v1/document/cancel
pub async fn handle_cancel(
    State(state): State<AppState>,
) -> Result<Json<DocumentView>, AppError> {
    transition(&state, EditSession::cancel).await
}

/// GET /api/v1/document/download
///
/// Plain-text attachment of the current text: the draft while editing, otherwise canonical.
pub async fn handle_download(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let workspace = state.workspace.lock().await;
    let session = workspace
        .session()
        .ok_or_else(|| AppError::NotFound("No optimized document yet".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_FILE_NAME}\""),
            ),
        ],
        session.current_text().to_string(),
    ))
}

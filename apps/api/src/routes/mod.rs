pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::optimization::handlers as optimization;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Upload → describe → review
        .route(
            "/api/v1/documents",
            post(optimization::handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/optimize", post(optimization::handle_optimize))
        // Review and edit
        .route("/api/v1/document", get(session::handle_get_document))
        .route("/api/v1/document/edit", post(session::handle_begin_edit))
        .route("/api/v1/document/draft", put(session::handle_update_draft))
        .route("/api/v1/document/save", post(session::handle_save))
        .route("/api/v1/document/cancel", post(session::handle_cancel))
        .route("/api/v1/document/download", get(session::handle_download))
        .with_state(state)
}

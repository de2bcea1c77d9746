use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::llm_client::ServiceError;
use crate::optimization::composer::ValidationError;
use crate::session::SessionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Extraction(e) => match e {
                ExtractionError::UnsupportedFormat(_) => {
                    (StatusCode::UNSUPPORTED_MEDIA_TYPE, "UNSUPPORTED_FORMAT")
                }
                ExtractionError::NoText => (StatusCode::UNPROCESSABLE_ENTITY, "NO_TEXT"),
                ExtractionError::PageReadFailed { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "PAGE_READ_FAILED")
                }
                ExtractionError::OpenFailed(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "DOCUMENT_UNREADABLE")
                }
                ExtractionError::LibraryLoadFailed(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "RENDERER_UNAVAILABLE")
                }
            },
            AppError::Service(e) => match e {
                ServiceError::Network(_) => (StatusCode::BAD_GATEWAY, "SERVICE_NETWORK_ERROR"),
                ServiceError::ApiError(_) => (StatusCode::BAD_GATEWAY, "SERVICE_API_ERROR"),
                ServiceError::MalformedResponse => {
                    (StatusCode::BAD_GATEWAY, "SERVICE_MALFORMED_RESPONSE")
                }
            },
            AppError::Session(_) => (StatusCode::CONFLICT, "INVALID_SESSION_STATE"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "An internal server error occurred".to_string()
            }
            AppError::Service(e) => {
                tracing::error!("Generation service error: {e}");
                e.to_string()
            }
            AppError::Extraction(e @ ExtractionError::LibraryLoadFailed(_)) => {
                tracing::error!("Extraction error: {e}");
                e.to_string()
            }
            other => {
                tracing::warn!("Request failed: {other}");
                other.to_string()
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::EditMode;

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(AppError, StatusCode)> = vec![
            (ValidationError::MissingInput.into(), StatusCode::BAD_REQUEST),
            (
                ExtractionError::UnsupportedFormat("text/plain".into()).into(),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (ExtractionError::NoText.into(), StatusCode::UNPROCESSABLE_ENTITY),
            (
                ExtractionError::LibraryLoadFailed("x".into()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (ServiceError::MalformedResponse.into(), StatusCode::BAD_GATEWAY),
            (
                SessionError::InvalidState {
                    operation: "save",
                    mode: EditMode::Viewing,
                }
                .into(),
                StatusCode::CONFLICT,
            ),
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (anyhow::anyhow!("boom").into(), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_validation_message_is_user_facing() {
        let err: AppError = ValidationError::MissingInput.into();
        assert_eq!(
            err.to_string(),
            "Please ensure both CV and Job Description are provided"
        );
    }
}

//! Workspace — the per-process pipeline state behind the API.
//!
//! Stages advance on pipeline outputs, not on client flags:
//! `Uploading` until text is extracted, `Describing` until a document has been
//! optimized for that text, then `Reviewing`.

use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::document::{PlainText, TargetDescription};
use crate::optimization::composer::ValidationError;
use crate::sanitizer::SanitizedDocument;
use crate::session::EditSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Uploading,
    Describing,
    Reviewing,
}

#[derive(Debug, Default)]
pub struct Workspace {
    plain_text: Option<PlainText>,
    target: Option<TargetDescription>,
    session: Option<EditSession>,
    optimizing: bool,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        match (&self.plain_text, &self.session) {
            (None, _) => Stage::Uploading,
            (Some(_), None) => Stage::Describing,
            (Some(_), Some(_)) => Stage::Reviewing,
        }
    }

    pub fn plain_text(&self) -> Option<&PlainText> {
        self.plain_text.as_ref()
    }

    pub fn target(&self) -> Option<&TargetDescription> {
        self.target.as_ref()
    }

    pub fn is_optimizing(&self) -> bool {
        self.optimizing
    }

    /// Stores freshly extracted text. The previous document's session no longer applies.
    pub fn accept_extraction(&mut self, text: PlainText) -> Result<(), AppError> {
        if self.optimizing {
            return Err(AppError::Conflict(
                "An optimization is in progress".to_string(),
            ));
        }
        info!("Accepted extracted document ({} chars)", text.char_count());
        self.plain_text = Some(text);
        self.session = None;
        Ok(())
    }

    /// Marks an optimization as in flight and returns the text to optimize.
    ///
    /// The pipeline does not guard against overlapping requests; this flag does.
    /// Missing inputs are rejected before anything is recorded.
    pub fn begin_optimization(&mut self, target: TargetDescription) -> Result<PlainText, AppError> {
        if self.optimizing {
            return Err(AppError::Conflict(
                "An optimization is already in progress".to_string(),
            ));
        }
        let text = self
            .plain_text
            .clone()
            .ok_or(ValidationError::MissingInput)?;
        if target.as_str().trim().is_empty() {
            return Err(ValidationError::MissingInput.into());
        }

        self.target = Some(target);
        self.optimizing = true;
        Ok(text)
    }

    /// Clears the in-flight flag. A successful result supersedes the current
    /// document; a failure leaves the extracted text, target and session as they were.
    pub fn finish_optimization(
        &mut self,
        result: Result<SanitizedDocument, AppError>,
    ) -> Result<&EditSession, AppError> {
        self.optimizing = false;
        let document = result?;
        Ok(&*self.session.insert(EditSession::new(document)))
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Result<&mut EditSession, AppError> {
        self.session
            .as_mut()
            .ok_or_else(|| AppError::NotFound("No optimized document yet".to_string()))
    }
}

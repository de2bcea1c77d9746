//! Edit Session — user edits layered over the canonical sanitized document.
//!
//! `Viewing` is the initial mode. `begin_edit` copies the canonical text into
//! the draft; `save` promotes the draft, `cancel` discards it. The canonical
//! document never changes while editing except through `save`.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::sanitizer::SanitizedDocument;

pub mod handlers;
pub mod workflow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    Viewing,
    Editing,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Operation '{operation}' is not allowed while {mode:?}")]
    InvalidState {
        operation: &'static str,
        mode: EditMode,
    },
}

#[derive(Debug, Clone)]
pub struct EditSession {
    canonical: SanitizedDocument,
    draft: String,
    mode: EditMode,
}

impl EditSession {
    pub fn new(canonical: SanitizedDocument) -> Self {
        let draft = canonical.as_str().to_string();
        Self {
            canonical,
            draft,
            mode: EditMode::Viewing,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn canonical(&self) -> &SanitizedDocument {
        &self.canonical
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// The text a download should contain: the draft while editing, otherwise canonical.
    pub fn current_text(&self) -> &str {
        match self.mode {
            EditMode::Editing => &self.draft,
            EditMode::Viewing => self.canonical.as_str(),
        }
    }

    pub fn begin_edit(&mut self) -> Result<(), SessionError> {
        self.require(EditMode::Viewing, "begin_edit")?;
        self.draft = self.canonical.as_str().to_string();
        self.mode = EditMode::Editing;
        debug!("Edit session entered editing mode");
        Ok(())
    }

    pub fn update_draft(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.require(EditMode::Editing, "update_draft")?;
        self.draft = text.into();
        Ok(())
    }

    pub fn save(&mut self) -> Result<(), SessionError> {
        self.require(EditMode::Editing, "save")?;
        self.canonical = SanitizedDocument::from_saved_draft(self.draft.clone());
        self.mode = EditMode::Viewing;
        debug!("Edit session saved draft ({} chars)", self.draft.len());
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), SessionError> {
        self.require(EditMode::Editing, "cancel")?;
        self.draft = self.canonical.as_str().to_string();
        self.mode = EditMode::Viewing;
        debug!("Edit session discarded draft");
        Ok(())
    }

    fn require(&self, mode: EditMode, operation: &'static str) -> Result<(), SessionError> {
        if self.mode == mode {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                mode: self.mode,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::RawCompletion;
    use crate::sanitizer::sanitize;

    fn session() -> EditSession {
        EditSession::new(sanitize(&RawCompletion::new("Jane Doe\nEXPERIENCE")))
    }

    #[test]
    fn test_new_session_is_viewing_with_draft_equal_to_canonical() {
        let s = session();
        assert_eq!(s.mode(), EditMode::Viewing);
        assert_eq!(s.draft(), s.canonical().as_str());
        assert_eq!(s.current_text(), "Jane Doe\nEXPERIENCE");
    }

    #[test]
    fn test_cancel_discards_draft() {
        let mut s = session();
        s.begin_edit().unwrap();
        s.update_draft("X").unwrap();
        assert_eq!(s.canonical().as_str(), "Jane Doe\nEXPERIENCE");
        s.cancel().unwrap();

        assert_eq!(s.mode(), EditMode::Viewing);
        assert_eq!(s.canonical().as_str(), "Jane Doe\nEXPERIENCE");
        assert_eq!(s.draft(), "Jane Doe\nEXPERIENCE");
    }

    #[test]
    fn test_save_promotes_draft() {
        let mut s = session();
        s.begin_edit().unwrap();
        s.update_draft("X").unwrap();
        s.save().unwrap();

        assert_eq!(s.mode(), EditMode::Viewing);
        assert_eq!(s.canonical().as_str(), "X");
        assert_eq!(s.current_text(), "X");
    }

    #[test]
    fn test_current_text_follows_draft_while_editing() {
        let mut s = session();
        s.begin_edit().unwrap();
        s.update_draft("work in progress").unwrap();
        assert_eq!(s.current_text(), "work in progress");
    }

    #[test]
    fn test_operations_in_viewing_are_invalid() {
        let mut s = session();
        for (result, operation) in [
            (s.clone().save(), "save"),
            (s.clone().cancel(), "cancel"),
            (s.update_draft("X"), "update_draft"),
        ] {
            assert_eq!(
                result,
                Err(SessionError::InvalidState {
                    operation,
                    mode: EditMode::Viewing
                })
            );
        }
        assert_eq!(s.canonical().as_str(), "Jane Doe\nEXPERIENCE");
    }

    #[test]
    fn test_begin_edit_twice_is_invalid_and_keeps_draft() {
        let mut s = session();
        s.begin_edit().unwrap();
        s.update_draft("draft").unwrap();

        let err = s.begin_edit().unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidState {
                operation: "begin_edit",
                mode: EditMode::Editing
            }
        );
        assert_eq!(s.draft(), "draft");
    }

    #[test]
    fn test_begin_edit_after_save_starts_from_new_canonical() {
        let mut s = session();
        s.begin_edit().unwrap();
        s.update_draft("first").unwrap();
        s.save().unwrap();
        s.begin_edit().unwrap();
        assert_eq!(s.draft(), "first");
    }
}

use bytes::Bytes;
use serde::Serialize;

/// The only declared format the extractor accepts.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Uploaded source content plus the media type the client declared for it.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub bytes: Bytes,
    pub media_type: String,
}

impl SourceDocument {
    pub fn new(bytes: impl Into<Bytes>, media_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: media_type.into(),
        }
    }

    /// True when the declared media type is PDF. Parameters (`; charset=...`) are ignored.
    pub fn is_pdf(&self) -> bool {
        self.media_type
            .split(';')
            .next()
            .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_MEDIA_TYPE))
            .unwrap_or(false)
    }
}

/// Text produced by the extractor. One line per page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PlainText(String);

impl PlainText {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

/// Free-form description of the role the document should be aligned with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TargetDescription(String);

impl TargetDescription {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The two messages sent to the generation service for a single call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimizationRequest {
    pub system: String,
    pub user: String,
}

/// Unfiltered text returned by the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCompletion(String);

impl RawCompletion {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_accepts_parameters_and_case() {
        assert!(SourceDocument::new(vec![], "application/pdf").is_pdf());
        assert!(SourceDocument::new(vec![], "Application/PDF; name=cv.pdf").is_pdf());
    }

    #[test]
    fn test_is_pdf_rejects_other_types() {
        assert!(!SourceDocument::new(vec![], "text/plain").is_pdf());
        assert!(!SourceDocument::new(vec![], "").is_pdf());
        assert!(!SourceDocument::new(vec![], "application/pdfx").is_pdf());
    }
}

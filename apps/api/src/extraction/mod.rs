//! Document Text Extractor — turns an uploaded PDF into one line of text per page.
//!
//! The page renderer is acquired lazily through a [`RendererProvider`] that is
//! constructed at startup and injected into [`DocumentExtractor`]. The provider
//! loads the renderer at most once; every later extraction reuses it.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::models::document::{PlainText, SourceDocument};

pub mod pdf;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported format '{0}': please upload a PDF file")]
    UnsupportedFormat(String),

    #[error("Could not extract text from the document. Ensure the PDF contains readable text")]
    NoText,

    #[error("Page renderer could not be loaded: {0}")]
    LibraryLoadFailed(String),

    #[error("Failed to read text of page {page}: {reason}")]
    PageReadFailed { page: usize, reason: String },

    #[error("Document could not be opened: {0}")]
    OpenFailed(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Page-rendering capability
// ────────────────────────────────────────────────────────────────────────────

/// Acquires a page renderer. Called at most once successfully per provider.
#[async_trait]
pub trait RendererLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn PageRenderer>, ExtractionError>;
}

/// A loaded renderer able to open documents.
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn open_document(&self, bytes: &[u8])
        -> Result<Box<dyn RenderedDocument>, ExtractionError>;
}

/// An opened document. Pages are 1-indexed.
#[async_trait]
pub trait RenderedDocument: Send + Sync {
    fn page_count(&self) -> usize;

    async fn page_text_tokens(&self, page: usize) -> Result<Vec<String>, ExtractionError>;
}

/// Lazily loads the renderer on first use and caches it for the provider's lifetime.
///
/// Concurrent first callers wait on the same load. A failed load is not cached,
/// so the next call tries again.
pub struct RendererProvider {
    loader: Arc<dyn RendererLoader>,
    renderer: OnceCell<Arc<dyn PageRenderer>>,
}

impl RendererProvider {
    pub fn new(loader: Arc<dyn RendererLoader>) -> Self {
        Self {
            loader,
            renderer: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.renderer.initialized()
    }

    pub async fn get(&self) -> Result<Arc<dyn PageRenderer>, ExtractionError> {
        let renderer = self
            .renderer
            .get_or_try_init(|| async {
                info!("Loading page renderer");
                let renderer = self.loader.load().await.map_err(|e| match e {
                    ExtractionError::LibraryLoadFailed(_) => e,
                    other => ExtractionError::LibraryLoadFailed(other.to_string()),
                })?;
                info!("Page renderer loaded");
                Ok::<_, ExtractionError>(renderer)
            })
            .await?;

        Ok(Arc::clone(renderer))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extractor
// ────────────────────────────────────────────────────────────────────────────

pub struct DocumentExtractor {
    provider: RendererProvider,
}

impl DocumentExtractor {
    pub fn new(provider: RendererProvider) -> Self {
        Self { provider }
    }

    pub fn renderer_loaded(&self) -> bool {
        self.provider.is_loaded()
    }

    /// Extracts the text of every page in order. Each page becomes one line whose
    /// tokens are joined by single spaces; the whole result is trimmed.
    pub async fn extract(&self, source: &SourceDocument) -> Result<PlainText, ExtractionError> {
        if !source.is_pdf() {
            return Err(ExtractionError::UnsupportedFormat(source.media_type.clone()));
        }

        let renderer = self.provider.get().await?;
        let document = renderer.open_document(&source.bytes).await?;
        let page_count = document.page_count();
        debug!("Opened document: {} bytes, {} pages", source.bytes.len(), page_count);

        let mut lines = Vec::with_capacity(page_count);
        for page in 1..=page_count {
            let tokens = document.page_text_tokens(page).await.map_err(|e| match e {
                ExtractionError::PageReadFailed { .. } => e,
                other => ExtractionError::PageReadFailed {
                    page,
                    reason: other.to_string(),
                },
            })?;
            lines.push(tokens.join(" "));
        }

        let text = lines.join("\n").trim().to_string();
        if text.is_empty() {
            warn!("Document with {page_count} pages produced no text");
            return Err(ExtractionError::NoText);
        }

        info!("Extracted {} chars from {} pages", text.len(), page_count);
        Ok(PlainText::new(text))
    }
}

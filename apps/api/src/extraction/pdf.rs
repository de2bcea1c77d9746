//! `pdf-extract` backed page renderer.
//!
//! pdf-extract decodes a whole document in one CPU-bound pass, so opening a
//! document runs that pass on tokio's blocking pool and keeps the per-page text.
//! Page tokens are the whitespace-separated words of each page.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use super::{ExtractionError, PageRenderer, RenderedDocument, RendererLoader};

/// Loads the pdf-extract renderer.
///
/// pdf-extract is linked into the binary and has nothing to acquire at load
/// time, so this loader always succeeds.
pub struct PdfExtractLoader;

#[async_trait]
impl RendererLoader for PdfExtractLoader {
    async fn load(&self) -> Result<Arc<dyn PageRenderer>, ExtractionError> {
        info!("pdf-extract renderer ready");
        Ok(Arc::new(PdfExtractRenderer))
    }
}

pub struct PdfExtractRenderer;

#[async_trait]
impl PageRenderer for PdfExtractRenderer {
    async fn open_document(
        &self,
        bytes: &[u8],
    ) -> Result<Box<dyn RenderedDocument>, ExtractionError> {
        let bytes = bytes.to_vec();
        let byte_len = bytes.len();

        let pages = tokio::task::spawn_blocking(move || decode_pages(&bytes))
            .await
            .map_err(|e| ExtractionError::OpenFailed(format!("extraction task failed: {e}")))??;

        debug!("Decoded {} pages from {} bytes", pages.len(), byte_len);
        Ok(Box::new(PdfDocument { pages }))
    }
}

/// Runs pdf-extract inside `catch_unwind`: it can panic on malformed fonts and glyphs.
fn decode_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    })) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => {
            warn!("PDF extraction failed: {e}");
            Err(ExtractionError::OpenFailed(e.to_string()))
        }
        Err(_panic) => {
            error!("PDF extraction panicked, likely malformed fonts");
            Err(ExtractionError::OpenFailed(
                "PDF extraction panicked, likely contains malformed fonts".to_string(),
            ))
        }
    }
}

struct PdfDocument {
    pages: Vec<String>,
}

#[async_trait]
impl RenderedDocument for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    async fn page_text_tokens(&self, page: usize) -> Result<Vec<String>, ExtractionError> {
        let text = page
            .checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .ok_or_else(|| ExtractionError::PageReadFailed {
                page,
                reason: format!("document has {} pages", self.pages.len()),
            })?;

        Ok(text.split_whitespace().map(String::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pdf_document_tokens_split_on_whitespace() {
        let document = PdfDocument {
            pages: vec!["  Jane   Doe\nEngineer ".to_string(), String::new()],
        };
        assert_eq!(document.page_count(), 2);
        assert_eq!(
            document.page_text_tokens(1).await.unwrap(),
            vec!["Jane", "Doe", "Engineer"]
        );
        assert!(document.page_text_tokens(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_pdf_document_out_of_range_page_fails() {
        let document = PdfDocument {
            pages: vec!["only".to_string()],
        };
        for page in [0, 2] {
            let err = document.page_text_tokens(page).await.unwrap_err();
            assert!(matches!(err, ExtractionError::PageReadFailed { .. }));
        }
    }

    #[tokio::test]
    async fn test_garbage_bytes_fail_to_open() {
        let renderer = PdfExtractLoader.load().await.unwrap();
        let result = renderer.open_document(b"definitely not a pdf").await;
        assert!(matches!(result, Err(ExtractionError::OpenFailed(_))));
    }
}

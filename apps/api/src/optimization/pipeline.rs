//! Optimization pipeline: Composer → Completion Client → Sanitizer, strictly in order.
//!
//! Extraction happens earlier, at upload time. Each stage finishes before the
//! next begins, and a failure at any stage returns before anything is produced.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::{CompletionConfig, LlmClient};
use crate::models::document::{PlainText, TargetDescription};
use crate::optimization::composer::compose;
use crate::sanitizer::{sanitize, SanitizedDocument};

pub async fn optimize(
    llm: &LlmClient,
    config: &CompletionConfig,
    plain_text: &PlainText,
    target: &TargetDescription,
) -> Result<SanitizedDocument, AppError> {
    let request = compose(plain_text, target)?;

    info!(
        "Requesting optimization: model={}, cv_chars={}, jd_chars={}",
        config.model,
        plain_text.char_count(),
        target.as_str().chars().count()
    );
    let raw = llm.complete(&request, config).await?;

    let document = sanitize(&raw);
    info!(
        "Optimization complete: raw_chars={}, sanitized_chars={}",
        raw.as_str().len(),
        document.as_str().len()
    );

    Ok(document)
}

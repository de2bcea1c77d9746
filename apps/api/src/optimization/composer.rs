//! Prompt Composer — builds the two-message request for one optimization call.

use thiserror::Error;

use crate::models::document::{OptimizationRequest, PlainText, TargetDescription};
use crate::optimization::prompts::{
    CURRENT_CV_HEADING, JOB_DESCRIPTION_HEADING, OPTIMIZE_SYSTEM, OPTIMIZE_USER_INTRO,
    OPTIMIZE_USER_OUTRO,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please ensure both CV and Job Description are provided")]
    MissingInput,
}

/// Composes the request. Pure and deterministic: the same inputs always give
/// the same messages, with both inputs embedded verbatim.
pub fn compose(
    plain_text: &PlainText,
    target: &TargetDescription,
) -> Result<OptimizationRequest, ValidationError> {
    if plain_text.as_str().trim().is_empty() || target.as_str().trim().is_empty() {
        return Err(ValidationError::MissingInput);
    }

    let user = format!(
        "{OPTIMIZE_USER_INTRO}\n\n\
         {JOB_DESCRIPTION_HEADING}\n{target}\n\n\
         {CURRENT_CV_HEADING}\n{cv}\n\n\
         {OPTIMIZE_USER_OUTRO}",
        target = target.as_str(),
        cv = plain_text.as_str(),
    );

    Ok(OptimizationRequest {
        system: OPTIMIZE_SYSTEM.to_string(),
        user,
    })
}

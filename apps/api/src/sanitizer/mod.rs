//! Response Sanitizer — strips the commentary generation services add around a CV.
//!
//! Two passes:
//! 1. A two-state line filter (`Normal`, `Skipping`) driven by [`classify`].
//!    A preface line switches to `Skipping`; the next CV-looking line switches back.
//!    Explanation bullets are dropped in either state.
//! 2. Whole-text cleanup: leading preamble phrases, runs of blank lines, outer whitespace.
//!
//! This is a best-effort heuristic. A genuine CV line that happens to look like an
//! explanation bullet is dropped, and novel preamble phrasing passes through.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::models::document::RawCompletion;

pub mod classify;

pub use classify::{classify, LineClass};

/// The canonical, cleaned document text.
///
/// Only [`sanitize`] and a saved edit session produce one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SanitizedDocument(String);

impl SanitizedDocument {
    /// Promotes a user's saved draft to canonical text. Used only by `EditSession::save`.
    pub(crate) fn from_saved_draft(draft: String) -> Self {
        Self(draft)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterState {
    Normal,
    Skipping,
}

/// Preambles removed from the very start of the filtered text, in this order.
const LEADING_PREAMBLES: &[&str] = &[
    r"^Here['’]s the optimized CV:?\s*",
    r"^Here is the optimized CV:?\s*",
    r"^Below is the optimized CV:?\s*",
    r"^The optimized CV is as follows:?\s*",
    r"^Optimized CV:?\s*",
    r"^Here['’]s your optimized resume:?\s*",
    r"^Here is your optimized resume:?\s*",
];

static LEADING_PREAMBLE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    LEADING_PREAMBLES
        .iter()
        .map(|p| {
            Regex::new(&format!("(?i){p}"))
                .unwrap_or_else(|e| panic!("invalid built-in pattern {p}: {e}"))
        })
        .collect()
});

static BLANK_LINE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").unwrap_or_else(|e| panic!("invalid built-in pattern: {e}")));

/// Sanitizes a raw completion into the canonical document.
pub fn sanitize(raw: &RawCompletion) -> SanitizedDocument {
    let filtered = filter_lines(raw.as_str());
    let cleaned = cleanup(&filtered);
    debug!(
        "Sanitized completion: {} -> {} chars",
        raw.as_str().len(),
        cleaned.len()
    );
    SanitizedDocument(cleaned)
}

/// First pass. Kept lines retain their original text and order.
pub fn filter_lines(text: &str) -> String {
    let mut state = FilterState::Normal;
    let mut kept: Vec<&str> = Vec::new();
    let mut dropped = 0usize;

    for line in text.split('\n') {
        let class = classify(line);
        let (keep, next) = match (state, class) {
            (FilterState::Normal, LineClass::PrefaceMarker) => (false, FilterState::Skipping),
            (FilterState::Normal, LineClass::ExplanationBullet) => (false, FilterState::Normal),
            (FilterState::Normal, LineClass::ResumeMarker | LineClass::Other) => {
                (true, FilterState::Normal)
            }
            (FilterState::Skipping, LineClass::ResumeMarker) => (true, FilterState::Normal),
            (FilterState::Skipping, _) => (false, FilterState::Skipping),
        };

        if keep {
            kept.push(line);
        } else {
            dropped += 1;
        }
        state = next;
    }

    debug!("Line filter kept {} lines, dropped {}", kept.len(), dropped);
    kept.join("\n")
}

/// One cleanup step: each leading preamble stripped once in listed order,
/// blank-line runs collapsed, outer whitespace trimmed.
fn cleanup_once(text: &str) -> String {
    let mut text = text.to_string();
    for re in LEADING_PREAMBLE_RES.iter() {
        if let Some(m) = re.find(&text) {
            text.replace_range(..m.end(), "");
        }
    }
    let collapsed = BLANK_LINE_RUN.replace_all(&text, "\n\n");
    collapsed.trim().to_string()
}

/// Second pass. Repeats [`cleanup_once`] until the text stops changing, so the
/// result is a fixed point even when trimming exposes another preamble.
/// Every step that changes the text makes it shorter, so this terminates.
pub fn cleanup(text: &str) -> String {
    let mut current = cleanup_once(text);
    loop {
        let next = cleanup_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> String {
        sanitize(&RawCompletion::new(text)).as_str().to_string()
    }

    #[test]
    fn test_preamble_bullets_then_body() {
        let raw = "Here is the optimized CV:\n\
                   - Enhanced skills section\n\
                   John Smith\n\
                   Software Engineer\n\
                   EXPERIENCE\n\
                   - Led a team of 5 engineers";
        assert_eq!(
            run(raw),
            "John Smith\nSoftware Engineer\nEXPERIENCE\n- Led a team of 5 engineers"
        );
    }

    #[test]
    fn test_resume_reentry_from_skipping() {
        let raw = "I optimized the CV by:\n\
                   focusing on cloud work\n\
                   and rewording the summary.\n\
                   \n\
                   JANE DOE\n\
                   Built things.";
        assert_eq!(run(raw), "JANE DOE\nBuilt things.");
    }

    #[test]
    fn test_clean_input_is_unchanged() {
        let raw = "Jane Doe\nSenior Engineer\n\nEXPERIENCE\n- Led a team of 5 engineers\n  Acme Corp, 2019-2023";
        assert_eq!(run(raw), raw);
    }

    #[test]
    fn test_clean_input_only_whitespace_is_normalized() {
        let raw = "\n\n  Jane Doe\n\n\n\nEXPERIENCE\n  ";
        assert_eq!(run(raw), "Jane Doe\n\nEXPERIENCE");
    }

    #[test]
    fn test_kept_lines_preserve_original_indentation() {
        let raw = "Optimized CV:\n   John Smith   \n    indented detail";
        assert_eq!(run(raw), "John Smith   \n    indented detail");
    }

    #[test]
    fn test_explanation_bullets_dropped_in_normal_state() {
        let raw = "Jane Doe\n- Added cloud keywords\nEXPERIENCE\n1. Tailored the summary\n- Built payments";
        assert_eq!(run(raw), "Jane Doe\nEXPERIENCE\n- Built payments");
    }

    #[test]
    fn test_trailing_commentary_after_body_is_dropped() {
        let raw = "Jane Doe\nEXPERIENCE\nKey optimizations:\n- Enhanced skills\nThis should help you stand out.";
        assert_eq!(run(raw), "Jane Doe\nEXPERIENCE");
    }

    #[test]
    fn test_preface_without_any_resume_marker_drops_everything() {
        let raw = "Here's your optimized resume:\nsome text\nmore text";
        assert_eq!(run(raw), "");
    }

    #[test]
    fn test_crlf_line_endings_classify_on_trimmed_text() {
        let raw = "Here is the optimized CV:\r\nJohn Smith\r\nEXPERIENCE\r\n";
        assert_eq!(run(raw), "John Smith\r\nEXPERIENCE");
    }

    #[test]
    fn test_cleanup_strips_leading_preambles_in_order() {
        assert_eq!(cleanup("Here is the optimized CV: Jane Doe"), "Jane Doe");
        assert_eq!(cleanup("Here is the optimized CV: Optimized CV:\nJane"), "Jane");
        assert_eq!(cleanup("optimized cv jane"), "jane");
    }

    #[test]
    fn test_cleanup_only_strips_at_text_start() {
        let text = "Jane Doe\nOptimized CV: keep me";
        assert_eq!(cleanup(text), text);
    }

    #[test]
    fn test_cleanup_collapses_blank_line_runs() {
        assert_eq!(cleanup("a\n\n\nb\n\n\n\n\nc\n\nd"), "a\n\nb\n\nc\n\nd");
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        for text in [
            "",
            "   ",
            "Jane Doe\n\n\n\nEXPERIENCE",
            "Optimized CV: Here is the optimized CV: Jane",
            "  Optimized CV:\n\n\n\nHere is your optimized resume:\nJane",
            "Here's the optimized CV:\n\n\n",
            "plain body\n\n\n\n",
        ] {
            let once = cleanup(text);
            assert_eq!(cleanup(&once), once, "text: {text:?}");
        }
    }

    #[test]
    fn test_cleanup_exposed_preamble_is_removed() {
        // Stripping "Optimized CV:" exposes a preamble earlier in the list.
        assert_eq!(cleanup("Optimized CV: Here is the optimized CV: Jane"), "Jane");
    }

    #[test]
    fn test_filter_lines_keeps_everything_for_plain_text() {
        let text = "line one\nline two";
        assert_eq!(filter_lines(text), text);
    }
}

//! Line classifier for generated CV text.
//!
//! An ordered pattern table: preface phrases first, then explanation bullets,
//! then markers of genuine CV content. The first class with a matching pattern
//! wins. Lines are classified after trimming.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Introductory commentary ("Here is the optimized CV:").
    PrefaceMarker,
    /// A bullet describing what was changed ("- Enhanced skills section").
    ExplanationBullet,
    /// A line that looks like CV content (name, section header, contact details).
    ResumeMarker,
    Other,
}

/// Verbs the generator uses to describe its own edits.
const EDIT_VERBS: &str = "Enhanced|Improved|Added|Highlighted|Emphasized|Repositioned|Reframed|\
                          Quantified|Aligned|Tailored|Optimized|Modified|Updated|Strengthened";

/// Nouns the generator uses when summarising which parts it touched.
const EDIT_NOUNS: &str = "keywords|skills|experience|achievements|accomplishments";

const PREFACE_PATTERNS: &[&str] = &[
    r"^I optimized the CV by:?",
    r"^I['’]ve optimized the CV by:?",
    r"^I have optimized the CV by:?",
    r"^Here['’]s how I optimized",
    r"^The following optimizations were made:?",
    r"^Key optimizations:?",
    r"^Changes made:?",
    r"^Optimizations:?",
    r"^Here['’]s the optimized CV:?",
    r"^Here is the optimized CV:?",
    r"^Below is the optimized CV:?",
    r"^The optimized CV is as follows:?",
    r"^Optimized CV:?",
    r"^Here['’]s your optimized resume:?",
    r"^Here is your optimized resume:?",
    r"^I['’]ve tailored your CV",
    r"^I have tailored your CV",
    r"^Based on the job description",
];

/// Compiles a fixed pattern list. The lists are constants, so a failure here is a bug.
fn compile(patterns: impl IntoIterator<Item = String>) -> Vec<Regex> {
    patterns
        .into_iter()
        .map(|p| Regex::new(&p).unwrap_or_else(|e| panic!("invalid built-in pattern {p}: {e}")))
        .collect()
}

static PREFACE: Lazy<Vec<Regex>> =
    Lazy::new(|| compile(PREFACE_PATTERNS.iter().map(|p| format!("(?i){p}"))));

static EXPLANATION_BULLET: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile([
        format!(r"(?i)^[-*•]\s*({EDIT_VERBS})"),
        // Capitalized lead word, any-case noun: "- Relevant skills ...".
        format!(r"^[-*•]\s*[A-Z][a-z]+ (?i:{EDIT_NOUNS})"),
        format!(r"(?i)^[-*•]\s*({EDIT_NOUNS})"),
        format!(r"(?i)^[0-9]+\.\s*({EDIT_VERBS})"),
    ])
});

static RESUME_MARKER: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(
        [
            // Full name
            r"^[A-Z][a-z]+ [A-Z][a-z]+\s*$",
            // ALL CAPS name or header
            r"^[A-Z][A-Z\s]+$",
            r"(?i)^PROFESSIONAL SUMMARY",
            r"(?i)^SUMMARY",
            r"(?i)^PROFILE",
            r"(?i)^EXPERIENCE",
            r"(?i)^WORK EXPERIENCE",
            r"(?i)^EDUCATION",
            r"(?i)^SKILLS",
            r"(?i)^CONTACT",
            r"(?i)^EMAIL:",
            r"(?i)^PHONE:",
            // Name | Title
            r"^[A-Za-z\s]+\s+\|\s+[A-Za-z\s]+",
            // Email address
            r"^(?-u:\w)+@(?-u:\w)+\.(?-u:\w)+",
            // Phone number
            r"^\+?[0-9]{1,3}[-.\s]?\(?[0-9]{1,4}\)?[-.\s]?[0-9]{1,4}[-.\s]?[0-9]{1,4}",
        ]
        .into_iter()
        .map(String::from),
    )
});

fn any_match(patterns: &[Regex], line: &str) -> bool {
    patterns.iter().any(|re| re.is_match(line))
}

/// Classifies one line. Pure: depends only on the trimmed line.
pub fn classify(line: &str) -> LineClass {
    let line = line.trim();

    if any_match(&PREFACE, line) {
        LineClass::PrefaceMarker
    } else if any_match(&EXPLANATION_BULLET, line) {
        LineClass::ExplanationBullet
    } else if any_match(&RESUME_MARKER, line) {
        LineClass::ResumeMarker
    } else {
        LineClass::Other
    }
}

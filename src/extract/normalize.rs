//! Text normalization applied to every extraction result.
//!
//! Raw extractor output is messy: hyphen-broken words at line ends, CRLF
//! mixes, stray indentation, runs of blank lines. Normalization has two
//! modes. Preserve-layout keeps the line structure and only trims the
//! noise. Flow mode additionally joins soft line breaks into sentences
//! while keeping blank-line paragraph boundaries intact.

use regex::Regex;
use std::sync::LazyLock;

static HYPHEN_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<prefix>\w)-\s*\n\s*(?P<suffix>\w)").unwrap());
static SPACE_BEFORE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+\n").unwrap());
static SPACE_AFTER_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n[ \t]+").unwrap());
static EXTRA_BREAKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());
static SPACE_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

/// Stand-in for paragraph boundaries while single breaks are rewritten.
const PARAGRAPH_MARK: &str = "<<<P>>>";

/// Normalize raw extracted text.
///
/// With `preserve_layout` the only changes are line-ending unification,
/// trailing-whitespace removal before breaks, capping blank-line runs at
/// one blank line, and trimming the whole text. Without it, hyphen-broken
/// words are rejoined, single line breaks become spaces, and horizontal
/// whitespace collapses to single spaces; double breaks survive as
/// paragraph separators.
///
/// Pure and idempotent: applying it to its own output changes nothing.
pub fn normalize(raw: &str, preserve_layout: bool) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let text = raw.replace("\r\n", "\n").replace('\r', "\n");

    if preserve_layout {
        let text = SPACE_BEFORE_BREAK.replace_all(&text, "\n");
        let text = EXTRA_BREAKS.replace_all(&text, "\n\n");
        return text.trim().to_string();
    }

    join_soft_breaks(&repair_line_structure(&text))
}

/// Rejoin hyphen-broken words and tidy line boundaries.
///
/// `trans-\nform` becomes `transform`; whitespace touching a line break is
/// dropped and runs of three or more breaks collapse to two.
fn repair_line_structure(text: &str) -> String {
    let text = HYPHEN_BREAK.replace_all(text, "$prefix$suffix");
    let text = SPACE_BEFORE_BREAK.replace_all(&text, "\n");
    let text = SPACE_AFTER_BREAK.replace_all(&text, "\n");
    let text = EXTRA_BREAKS.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Convert single line breaks inside paragraphs to spaces, keep blank lines.
fn join_soft_breaks(text: &str) -> String {
    let text = text
        .replace("\n\n", PARAGRAPH_MARK)
        .replace('\n', " ")
        .replace(PARAGRAPH_MARK, "\n\n");
    let text = SPACE_RUNS.replace_all(&text, " ");
    let text = EXTRA_BREAKS.replace_all(&text, "\n\n");
    text.trim().to_string()
}

// ─── Tests ──────────────────────────────────────────────────────────────────

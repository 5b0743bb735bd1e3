//! Strong and italic rewriting.
//!
//! Markdown renderers decide whether `**` opens emphasis from the characters
//! around it. Hangul, kana and han have no word boundaries in that sense, so
//! `**강조**에` stays literal. Rewriting the markers to explicit tags before
//! rendering sidesteps the delimiter rules.
//!
//! Both passes expect shielded text; code and math must already be tokens.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// `**content**`: content starts and ends with neither `*` nor whitespace and
/// may span lines. The shortest well-formed content wins: the optional tail
/// is lazy, so `**a** and **b**` is two spans. A greedy tail would take it as
/// one span, `a** and **b`.
static STRONG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\*\*([^*\s](?:.*?[^*\s])??)\*\*").unwrap());

/// `*content*` on one line with no `*` inside. The characters either side
/// must not be `*` (or must be the ends of the text); they are captured and
/// written back so a marker that belongs to a `**` run is never used.
static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^*])\*([^*\s](?:[^*\n]*?[^*\s])??)\*([^*]|$)").unwrap()
});

/// Replace every `**content**` with `<strong>content</strong>`.
pub fn rewrite_strong(text: &str) -> Cow<'_, str> {
    STRONG_RE.replace_all(text, "<strong>${1}</strong>")
}

/// Replace every single-marker `*content*` with `<em>content</em>`.
///
/// Matches do not overlap and each consumes one boundary character on both
/// sides, so in `*a* *b*` only the first span is rewritten.
pub fn rewrite_italic(text: &str) -> Cow<'_, str> {
    ITALIC_RE.replace_all(text, "${1}<em>${2}</em>${3}")
}

/// Strong first, then italic.
pub fn rewrite(text: &str) -> String {
    let strong = rewrite_strong(text);
    rewrite_italic(&strong).into_owned()
}

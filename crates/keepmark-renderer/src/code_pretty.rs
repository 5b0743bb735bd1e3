//! Fenced code highlighting with syntect's classed HTML output.
//!
//! Spans carry `km-` prefixed scope classes; the colours come from the
//! stylesheet built by [`crate::css::syntax_css`].

use std::sync::LazyLock;

use pulldown_cmark_escape::escape_html;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// Class prefix for highlighted spans.
pub const CSS_PREFIX: &str = "km-";

pub const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: CSS_PREFIX };

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("no syntax for language {0:?}")]
    UnknownLanguage(String),
    #[error(transparent)]
    Syntect(#[from] syntect::Error),
}

/// Highlight `code` as `lang` and write a complete `<pre><code>` block to
/// `output`.
pub fn highlight(lang: &str, code: &str, output: &mut String) -> Result<(), HighlightError> {
    let syntax = SYNTAX_SET
        .find_syntax_by_token(lang)
        .ok_or_else(|| HighlightError::UnknownLanguage(lang.to_string()))?;

    let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, CLASS_STYLE);
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }

    output.push_str("<pre><code class=\"language-");
    let _ = escape_html(&mut *output, lang);
    output.push_str("\">");
    output.push_str(&generator.finalize());
    output.push_str("</code></pre>\n");
    Ok(())
}

/// Highlight if possible, otherwise fall back to a plain block.
pub fn code_block_html(lang: Option<&str>, code: &str) -> String {
    let mut output = String::with_capacity(code.len() * 2);
    if let Some(lang) = lang {
        match highlight(lang, code, &mut output) {
            Ok(()) => return output,
            Err(e) => {
                tracing::debug!(lang, error = %e, "highlighting failed, using plain block");
                output.clear();
            }
        }
    }
    crate::events::plain_code_block(lang, code, &mut output);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_known_language() {
        let html = code_block_html(Some("rust"), "fn main() {}\n");
        assert!(html.starts_with("<pre><code class=\"language-rust\">"));
        assert!(html.contains("class=\"km-"));
        assert!(html.ends_with("</code></pre>\n"));
    }

    #[test]
    fn unknown_language_is_plain() {
        let html = code_block_html(Some("nosuchlang"), "a<b\n");
        assert_eq!(
            html,
            "<pre><code class=\"language-nosuchlang\">a&lt;b\n</code></pre>\n"
        );
    }

    #[test]
    fn no_language_is_plain() {
        let html = code_block_html(None, "**x**\n");
        assert_eq!(html, "<pre><code>**x**\n</code></pre>\n");
    }
}

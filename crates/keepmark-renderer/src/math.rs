//! TeX math → MathML with pulldown-latex.
//!
//! Preview math is typed live, so most renders of a formula happen while it
//! is still broken. Failures show the escaped source in a `math-error` span
//! instead.

use pulldown_cmark_escape::escape_html;
use pulldown_latex::config::{DisplayMode, RenderConfig};
use pulldown_latex::mathml::push_mathml;
use pulldown_latex::{Parser, Storage};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct MathError {
    pub message: String,
}

/// Typeset `latex` (no delimiters) as a `<math>` element. `is_block` picks
/// block layout over inline.
pub fn render_math(latex: &str, is_block: bool) -> Result<String, MathError> {
    let storage = Storage::new();
    let events: Vec<_> = Parser::new(latex, &storage).collect();

    let parse_errors: Vec<String> = events
        .iter()
        .filter_map(|event| event.as_ref().err())
        .map(ToString::to_string)
        .collect();
    if !parse_errors.is_empty() {
        return Err(MathError {
            message: parse_errors.join("; "),
        });
    }

    let config = RenderConfig {
        display_mode: if is_block {
            DisplayMode::Block
        } else {
            DisplayMode::Inline
        },
        ..Default::default()
    };
    let mut mathml = String::new();
    push_mathml(&mut mathml, events.into_iter(), config).map_err(|e| MathError {
        message: e.to_string(),
    })?;
    Ok(mathml)
}

/// MathML, or the source in an error span when `latex` doesn't parse.
pub fn render_math_html(latex: &str, is_block: bool) -> String {
    match render_math(latex, is_block) {
        Ok(mathml) => mathml,
        Err(e) => {
            tracing::debug!(is_block, error = %e, "latex render failed, showing source");
            error_html(latex, &e.message, is_block)
        }
    }
}

fn error_html(latex: &str, message: &str, is_block: bool) -> String {
    let class = if is_block { "math-display" } else { "math-inline" };
    let mut out = format!("<span class=\"math math-error {class}\" title=\"");
    let _ = escape_html(&mut out, message);
    out.push_str("\"><code>");
    let _ = escape_html(&mut out, latex);
    out.push_str("</code></span>");
    out
}

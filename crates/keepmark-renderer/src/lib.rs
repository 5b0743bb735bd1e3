//! keepmark renderer
//!
//! Takes raw editor text through the keepmark-core pre-render pipeline, then
//! renders the result to preview HTML with pulldown-cmark. Math is typeset to
//! MathML, fenced code is highlighted, SVG images are embedded as objects.
//!

use keepmark_core::{Pipeline, PipelineOptions, TextStats};
use pulldown_cmark::{Options, Parser, html};

#[cfg(feature = "syntax-highlighting")]
pub mod code_pretty;
#[cfg(feature = "syntax-highlighting")]
pub mod css;
pub mod events;
pub mod math;

#[cfg(feature = "syntax-highlighting")]
pub use css::{RenderError, syntax_css};
pub use events::PreviewEvents;

/// Preview rendering switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// GitHub-flavoured extensions: tables, strikethrough, task lists,
    /// footnotes, alert blockquotes.
    pub gfm: bool,
    /// Single newlines inside a paragraph become `<br />`.
    pub breaks: bool,
    /// Parse `$..$` / `$$..$$` and typeset it.
    pub math: bool,
    /// Highlight fenced code that names a language.
    pub highlight: bool,
    /// Embed `.svg` images with `<object>` instead of `<img>`.
    pub svg_objects: bool,
    /// Pre-render pipeline steps.
    pub pipeline: PipelineOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            breaks: true,
            math: true,
            highlight: true,
            svg_objects: true,
            pipeline: PipelineOptions::default(),
        }
    }
}

impl RenderOptions {
    pub fn md_options(&self) -> Options {
        let mut options = Options::empty();
        if self.gfm {
            options |= Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM;
        }
        if self.math {
            options |= Options::ENABLE_MATH;
        }
        options
    }
}

/// Rendered preview plus the status-line counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub html: String,
    /// Counted over the pre-rendered text, not the HTML.
    pub stats: TextStats,
}

/// Render raw editor text to preview HTML.
pub fn render_markdown(raw: &str, options: &RenderOptions) -> Rendered {
    let prepared = Pipeline::new(options.pipeline).run(raw);
    let stats = TextStats::of(prepared.trim());

    let parser = Parser::new_ext(&prepared, options.md_options());
    let mut out = String::with_capacity(prepared.len() * 3 / 2);
    html::push_html(&mut out, PreviewEvents::new(parser, *options));

    tracing::debug!(
        input_len = raw.len(),
        html_len = out.len(),
        words = stats.words,
        "rendered preview"
    );

    Rendered {
        html: out,
        stats: TextStats {
            chars: prepared.chars().count(),
            ..stats
        },
    }
}

/// Render a loaded document by name: SVG files are shown as they are,
/// everything else is Markdown.
pub fn render_document(name: &str, content: &str, options: &RenderOptions) -> Rendered {
    if is_svg_path(name) {
        return Rendered {
            html: content.to_string(),
            stats: TextStats {
                chars: content.chars().count(),
                ..TextStats::of(content.trim())
            },
        };
    }
    render_markdown(content, options)
}

/// Whether a path or URL names an SVG file, ignoring any query or fragment.
pub fn is_svg_path(path: &str) -> bool {
    let path = path.trim();
    let path = path.split(['?', '#']).next().unwrap_or(path);
    path.len() >= 4
        && path.is_char_boundary(path.len() - 4)
        && path[path.len() - 4..].eq_ignore_ascii_case(".svg")
}

/// Wrap rendered HTML in a minimal standalone page.
pub fn html_page(title: &str, body: &str, css: &str) -> String {
    let mut escaped_title = String::new();
    let _ = pulldown_cmark_escape::escape_html(&mut escaped_title, title);
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{escaped_title}</title>\n<style>\n{css}</style>\n</head>\n<body>\n<article class=\"keep-preview\">\n{body}</article>\n</body>\n</html>\n"
    )
}

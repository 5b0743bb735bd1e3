//! Event rewriting between the Markdown parser and the HTML writer.
//!
//! `PreviewEvents` wraps a parser and swaps the events the stock writer
//! can't handle the way the preview wants:
//! - math → MathML (or the source in an error span)
//! - fenced code → highlighted `<pre><code>`
//! - images → `<img>`, or `<object>` for SVGs
//! - soft breaks → hard breaks when `breaks` is on

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use pulldown_cmark_escape::{escape_href, escape_html, escape_html_body_text};

use crate::RenderOptions;
use crate::math::render_math_html;

pub struct PreviewEvents<'a, I: Iterator<Item = Event<'a>>> {
    iter: I,
    options: RenderOptions,
    _phantom: std::marker::PhantomData<&'a ()>,
}

impl<'a, I: Iterator<Item = Event<'a>>> PreviewEvents<'a, I> {
    pub fn new(iter: I, options: RenderOptions) -> Self {
        Self {
            iter,
            options,
            _phantom: std::marker::PhantomData,
        }
    }

    /// Consume the rest of a code block and emit it as one HTML event.
    fn code_block(&mut self, kind: CodeBlockKind<'a>) -> Event<'a> {
        let mut code = String::new();
        for event in self.iter.by_ref() {
            match event {
                Event::End(TagEnd::CodeBlock) => break,
                Event::Text(text) => code.push_str(&text),
                _ => {}
            }
        }

        let lang = match &kind {
            CodeBlockKind::Fenced(info) => info.split_whitespace().next(),
            CodeBlockKind::Indented => None,
        };
        let html = if self.options.highlight {
            highlighted_code_block(lang, &code)
        } else {
            let mut out = String::new();
            plain_code_block(lang, &code, &mut out);
            out
        };
        Event::Html(CowStr::from(html))
    }

    /// Consume the alt text of an image and emit the element.
    fn image(&mut self, dest_url: CowStr<'a>, title: CowStr<'a>) -> Event<'a> {
        let mut alt = String::new();
        let mut depth = 0usize;
        for event in self.iter.by_ref() {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(TagEnd::Image) if depth == 0 => break,
                Event::End(_) => depth = depth.saturating_sub(1),
                Event::Text(text) | Event::Code(text) => alt.push_str(&text),
                _ => {}
            }
        }

        let html = if self.options.svg_objects && crate::is_svg_path(&dest_url) {
            svg_object_html(&dest_url, &title, &alt)
        } else {
            img_html(&dest_url, &title, &alt)
        };
        Event::InlineHtml(CowStr::from(html))
    }
}

impl<'a, I: Iterator<Item = Event<'a>>> Iterator for PreviewEvents<'a, I> {
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let event = self.iter.next()?;
        Some(match event {
            Event::Start(Tag::CodeBlock(kind)) => self.code_block(kind),
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => self.image(dest_url, title),
            Event::InlineMath(latex) if self.options.math => {
                Event::InlineHtml(CowStr::from(render_math_html(&latex, false)))
            }
            Event::DisplayMath(latex) if self.options.math => {
                Event::InlineHtml(CowStr::from(render_math_html(&latex, true)))
            }
            Event::SoftBreak if self.options.breaks => Event::HardBreak,
            other => other,
        })
    }
}

#[cfg(feature = "syntax-highlighting")]
fn highlighted_code_block(lang: Option<&str>, code: &str) -> String {
    crate::code_pretty::code_block_html(lang, code)
}

#[cfg(not(feature = "syntax-highlighting"))]
fn highlighted_code_block(lang: Option<&str>, code: &str) -> String {
    let mut out = String::new();
    plain_code_block(lang, code, &mut out);
    out
}

/// Escaped `<pre><code>` block, with a `language-` class when known.
pub fn plain_code_block(lang: Option<&str>, code: &str, output: &mut String) {
    match lang {
        Some(lang) => {
            output.push_str("<pre><code class=\"language-");
            let _ = escape_html(&mut *output, lang);
            output.push_str("\">");
        }
        None => output.push_str("<pre><code>"),
    }
    let _ = escape_html_body_text(&mut *output, code);
    output.push_str("</code></pre>\n");
}

fn title_attr(title: &str, out: &mut String) {
    if !title.is_empty() {
        out.push_str(" title=\"");
        let _ = escape_html(&mut *out, title);
        out.push('"');
    }
}

fn img_html(src: &str, title: &str, alt: &str) -> String {
    let mut out = String::from("<img src=\"");
    let _ = escape_href(&mut out, src);
    out.push_str("\" alt=\"");
    let _ = escape_html(&mut out, alt);
    out.push('"');
    title_attr(title, &mut out);
    out.push('>');
    out
}

/// SVGs go in an `<object>` so scripts and styles inside them work; the
/// alt text doubles as the fallback content.
fn svg_object_html(data: &str, title: &str, alt: &str) -> String {
    let mut out = String::from("<object class=\"md-svg-object\" type=\"image/svg+xml\" data=\"");
    let _ = escape_href(&mut out, data);
    out.push_str("\" aria-label=\"");
    let _ = escape_html(&mut out, alt);
    out.push('"');
    title_attr(title, &mut out);
    out.push('>');
    let _ = escape_html_body_text(&mut out, alt);
    out.push_str("</object>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn img_escapes_attributes() {
        assert_eq!(
            img_html("a.png", "t\"q", "x<y"),
            "<img src=\"a.png\" alt=\"x&lt;y\" title=\"t&quot;q\">"
        );
    }

    #[test]
    fn svg_object() {
        assert_eq!(
            svg_object_html("img/logo.svg", "", "logo"),
            "<object class=\"md-svg-object\" type=\"image/svg+xml\" data=\"img/logo.svg\" aria-label=\"logo\">logo</object>"
        );
    }

    #[test]
    fn plain_block_without_language() {
        let mut out = String::new();
        plain_code_block(None, "a & b\n", &mut out);
        assert_eq!(out, "<pre><code>a &amp; b\n</code></pre>\n");
    }
}

//! The pre-render pipeline.
//!
//! Runs on every input event, before the text reaches the Markdown renderer:
//!
//! 1. wrap bare `\begin{..}..\end{..}` blocks in `$$`
//! 2. shield code spans, fenced blocks and math
//! 3. rewrite `**strong**`, then `*italic*`, to tags
//! 4. restore the shielded regions verbatim
//!
//! Every step is total. Markup that doesn't match a pattern passes through.

use crate::{emphasis, math, shield};

/// Which pipeline steps run. Shielding and restoring always run when any
/// rewriting step is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Wrap bare LaTeX environments in display-math delimiters.
    pub wrap_math: bool,
    /// Rewrite strong/italic markers to explicit tags.
    pub rewrite_emphasis: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            wrap_math: true,
            rewrite_emphasis: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Transform raw editor text into renderer-ready text.
    pub fn run(&self, raw: &str) -> String {
        let (text, wrapped) = if self.options.wrap_math {
            let result = math::wrap_environments(raw);
            (result.text, result.wrapped)
        } else {
            (raw.to_string(), 0)
        };

        if !self.options.rewrite_emphasis {
            tracing::trace!(target: "keepmark::transform", wrapped, "pipeline run (no emphasis)");
            return text;
        }

        let shielded = shield::shield(&text);
        let rewritten = emphasis::rewrite(&shielded.text);
        let output = shielded.restore(&rewritten);

        tracing::trace!(
            target: "keepmark::transform",
            wrapped,
            shielded = shielded.len(),
            input_len = raw.len(),
            output_len = output.len(),
            "pipeline run"
        );

        output
    }
}

/// Run the full pipeline with every step enabled.
pub fn render_pipeline(raw: &str) -> String {
    Pipeline::default().run(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emphasis_is_rewritten() {
        assert!(render_pipeline("**bold**").contains("<strong>bold</strong>"));
        assert!(render_pipeline("*it*").contains("<em>it</em>"));
    }

    #[test]
    fn strong_closes_before_hangul_particle() {
        let out = render_pipeline("**강조**에");
        assert_eq!(out, "<strong>강조</strong>에");
        assert!(!out.contains("<em>"));
    }

    #[test]
    fn fenced_block_round_trips() {
        let fence = "```js\nconst a = 2 * b * c;\nlet s = \"**not bold**\";\n```";
        let input = format!("**title**\n\n{fence}\n\n*after*");
        let out = render_pipeline(&input);
        assert!(out.contains(fence));
        assert!(out.starts_with("<strong>title</strong>"));
        assert!(out.ends_with("<em>after</em>"));
    }

    #[test]
    fn inline_code_is_not_rewritten() {
        assert_eq!(
            render_pipeline("use `**kwargs` and **this**"),
            "use `**kwargs` and <strong>this</strong>"
        );
    }

    #[test]
    fn multi_line_code_span_keeps_later_spans_shielded() {
        let input = "`a\nb` and `*c*`";
        assert_eq!(render_pipeline(input), input);
    }

    #[test]
    fn environment_is_wrapped_once() {
        let out = render_pipeline(r"\begin{align}x=1\end{align}");
        assert_eq!(out, "$$\n\\begin{align}x=1\\end{align}\n$$");

        let out = render_pipeline(r"$$\begin{align}x=1\end{align}$$");
        assert_eq!(out.matches("$$").count(), 2);
    }

    #[test]
    fn math_contents_are_protected() {
        let input = r"\begin{align}a*b*c\end{align}";
        let out = render_pipeline(input);
        assert!(out.contains("a*b*c"));
        assert!(!out.contains("<em>"));
    }

    #[test]
    fn malformed_environment_is_open_to_emphasis() {
        let out = render_pipeline(r"\begin{x} *y*");
        assert_eq!(out, "\\begin{x} <em>y</em>");
    }

    #[test]
    fn steps_can_be_disabled() {
        let pipeline = Pipeline::new(PipelineOptions {
            wrap_math: false,
            rewrite_emphasis: false,
        });
        let input = "**a** \\begin{b}c\\end{b}";
        assert_eq!(pipeline.run(input), input);

        let pipeline = Pipeline::new(PipelineOptions {
            wrap_math: false,
            rewrite_emphasis: true,
        });
        assert_eq!(pipeline.run(input), "<strong>a</strong> \\begin{b}c\\end{b}");
    }

    #[test]
    fn empty_input() {
        assert_eq!(render_pipeline(""), "");
    }

    #[test]
    fn snapshot_mixed_document() {
        let input = "# 제목\n\n**굵게**와 *기울임*을 쓴다.\n\n- `*code*` 그대로\n\n\\begin{cases}a*b\\end{cases}";
        insta::assert_snapshot!(render_pipeline(input), @r"
        # 제목

        <strong>굵게</strong>와 <em>기울임</em>을 쓴다.

        - `*code*` 그대로

        $$
        \begin{cases}a*b\end{cases}
        $$
        ");
    }
}

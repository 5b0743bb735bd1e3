//! Display-math auto-wrapping for bare LaTeX environments.
//!
//! A `\begin{align}...\end{align}` typed straight into the buffer is only
//! typeset by the downstream math renderer when it sits inside a `$$` pair.
//! This pass adds the pair, leaving blocks that already have one alone.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Display-math delimiter written on its own line around wrapped blocks.
pub const DISPLAY_MATH_DELIM: &str = "$$";

/// Opening of either an already delimited block (`$$`) or a named
/// environment (`\begin{NAME}`, NAME captured with its optional `*`).
static BLOCK_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\$|\\begin\{([a-zA-Z]*\*?)\}").unwrap());

/// Output of [`wrap_environments`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapped {
    pub text: String,
    /// Number of environments that received a new `$$` pair.
    pub wrapped: usize,
}

/// Wrap every bare `\begin{NAME}...\end{NAME}` block in display-math
/// delimiters.
///
/// The scan runs left to right. At each candidate position a `$$...$$` block
/// is copied through whole, so an environment inside one is never wrapped a
/// second time. An opener without its closer (`$$` with no second `$$`,
/// `\begin{x}` with no `\end{x}`) matches nothing and the scan resumes one
/// character later.
///
/// A closer missing after one opener is missing after every later one, so
/// each kind of closer is searched for until it first turns up missing and
/// the pass stays linear.
pub fn wrap_environments(text: &str) -> Wrapped {
    let mut out = String::with_capacity(text.len());
    let mut wrapped = 0;
    let mut copied = 0;
    let mut pos = 0;
    // `None` stands for the `$$` closer.
    let mut unclosed: HashSet<Option<&str>> = HashSet::new();

    while let Some(caps) = BLOCK_OPEN_RE.captures_at(text, pos) {
        let Some(open) = caps.get(0) else { break };

        let env = caps.get(1).map(|name| name.as_str());
        let end = if unclosed.contains(&env) {
            None
        } else {
            find_block_end(text, open.end(), env)
        };
        let Some(end) = end else {
            unclosed.insert(env);
            // Both openers start with an ASCII byte.
            pos = open.start() + 1;
            continue;
        };

        out.push_str(&text[copied..open.start()]);
        let block = &text[open.start()..end];
        if env.is_some() {
            out.push_str(DISPLAY_MATH_DELIM);
            out.push('\n');
            out.push_str(block);
            out.push('\n');
            out.push_str(DISPLAY_MATH_DELIM);
            wrapped += 1;
        } else {
            out.push_str(block);
        }
        copied = end;
        pos = end;
    }

    out.push_str(&text[copied..]);
    Wrapped { text: out, wrapped }
}

/// Byte offset just past the closer matching an opener that ends at
/// `body_start`. `env` is the environment name, or `None` for `$$`.
fn find_block_end(text: &str, body_start: usize, env: Option<&str>) -> Option<usize> {
    let rest = &text[body_start..];
    match env {
        None => rest
            .find(DISPLAY_MATH_DELIM)
            .map(|at| body_start + at + DISPLAY_MATH_DELIM.len()),
        Some(name) => {
            let closer = format!("\\end{{{name}}}");
            rest.find(&closer).map(|at| body_start + at + closer.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_bare_environment() {
        let result = wrap_environments(r"\begin{align}x=1\end{align}");
        assert_eq!(result.text, "$$\n\\begin{align}x=1\\end{align}\n$$");
        assert_eq!(result.wrapped, 1);
    }

    #[test]
    fn leaves_delimited_block_alone() {
        let input = r"$$\begin{align}x=1\end{align}$$";
        let result = wrap_environments(input);
        assert_eq!(result.text, input);
        assert_eq!(result.wrapped, 0);
    }

    #[test]
    fn starred_environment_name() {
        let input = "a\n\\begin{align*}\nx &= 1\n\\end{align*}\nb";
        let result = wrap_environments(input);
        assert_eq!(
            result.text,
            "a\n$$\n\\begin{align*}\nx &= 1\n\\end{align*}\n$$\nb"
        );
    }

    #[test]
    fn closer_must_use_same_name() {
        // \end{align*} does not close \begin{align}
        let input = r"\begin{align}x\end{align*}";
        assert_eq!(wrap_environments(input).text, input);
    }

    #[test]
    fn stops_at_first_matching_closer() {
        let input = r"\begin{cases}a\end{cases} mid \begin{cases}b\end{cases}";
        let result = wrap_environments(input);
        assert_eq!(result.wrapped, 2);
        assert_eq!(
            result.text,
            "$$\n\\begin{cases}a\\end{cases}\n$$ mid $$\n\\begin{cases}b\\end{cases}\n$$"
        );
    }

    #[test]
    fn unterminated_environment_is_untouched() {
        let input = r"\begin{matrix} 1 & 2";
        assert_eq!(wrap_environments(input).text, input);
    }

    #[test]
    fn unterminated_dollars_do_not_hide_later_environment() {
        let input = "cost $$ 5\n\\begin{x}y\\end{x}";
        let result = wrap_environments(input);
        assert_eq!(result.text, "cost $$ 5\n$$\n\\begin{x}y\\end{x}\n$$");
    }

    #[test]
    fn environment_after_delimited_block_is_wrapped() {
        let input = "$$a$$\n\\begin{eq}b\\end{eq}";
        let result = wrap_environments(input);
        assert_eq!(result.text, "$$a$$\n$$\n\\begin{eq}b\\end{eq}\n$$");
        assert_eq!(result.wrapped, 1);
    }

    #[test]
    fn many_unterminated_openers() {
        let mut input = "\\begin{a} ".repeat(40_000);
        input.push_str("$$ x");
        let result = wrap_environments(&input);
        assert_eq!(result.text, input);
        assert_eq!(result.wrapped, 0);
    }

    #[test]
    fn missing_closer_for_one_name_does_not_block_others() {
        let input = r"\begin{a} \begin{b}x\end{b} \begin{a}";
        let result = wrap_environments(input);
        assert_eq!(result.text, "\\begin{a} $$\n\\begin{b}x\\end{b}\n$$ \\begin{a}");
        assert_eq!(result.wrapped, 1);
    }

    #[test]
    fn multibyte_text_around_blocks() {
        let input = "수식: \\begin{a}x\\end{a} 끝";
        let result = wrap_environments(input);
        assert_eq!(result.text, "수식: $$\n\\begin{a}x\\end{a}\n$$ 끝");
    }
}

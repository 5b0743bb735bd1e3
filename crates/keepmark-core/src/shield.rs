//! Shielding of code and math regions from emphasis rewriting.
//!
//! `shield` swaps every protected span for a `__PROT_<index>__` token and
//! hands back the originals in order; `Shielded::restore` puts them back.
//! The pair is a plain value, so shielding can be tested on its own and run
//! twice without shared scratch state.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Prefix shared by every placeholder token.
pub const TOKEN_PREFIX: &str = "__PROT_";

/// Protected spans, leftmost first, alternatives in priority order:
/// fenced code block, inline code span (may cross lines), `$$` block, named
/// environment, and finally any literal token prefix already in the input.
///
/// Shielding that last one means every `__PROT_` left in the shielded text
/// starts a token we produced, so restoring can never pick up user text.
static PROTECTED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?s)```.*?```",
        r"|`[^`]*`",
        r"|\$\$.*?\$\$",
        r"|\\begin\{[a-zA-Z]*\*?\}.*?\\end\{[a-zA-Z]*\*?\}",
        r"|__PROT_",
    ))
    .unwrap()
});

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__PROT_(\d+)__").unwrap());

/// Text with its protected regions replaced by placeholder tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Shielded {
    /// The input with each protected span replaced by `__PROT_<index>__`.
    pub text: String,
    /// Original spans; a token's index is its position here.
    pub originals: Vec<String>,
}

impl Shielded {
    /// Number of protected regions.
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }

    /// Replace every token in `text` with its original span, verbatim.
    ///
    /// `text` is normally `self.text` after some rewriting that leaves tokens
    /// intact. A token whose index is out of range is left as it is.
    pub fn restore(&self, text: &str) -> String {
        if self.originals.is_empty() {
            return text.to_string();
        }
        TOKEN_RE
            .replace_all(text, |caps: &Captures<'_>| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|index| self.originals.get(index))
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// Make the placeholder token for a protected region.
pub fn token(index: usize) -> String {
    format!("{TOKEN_PREFIX}{index}__")
}

/// Shield code and math regions in a single left-to-right pass.
///
/// Matches never overlap: an inline span inside a fenced block is part of the
/// fenced match and is not shielded separately.
pub fn shield(text: &str) -> Shielded {
    let mut originals = Vec::new();
    let shielded = PROTECTED_RE.replace_all(text, |caps: &Captures<'_>| {
        originals.push(caps[0].to_string());
        token(originals.len() - 1)
    });
    Shielded {
        text: shielded.into_owned(),
        originals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(input: &str) -> String {
        let shielded = shield(input);
        shielded.restore(&shielded.text)
    }

    #[test]
    fn shields_fenced_block() {
        let input = "before\n```rust\nlet x = *y*;\n```\nafter";
        let shielded = shield(input);
        assert_eq!(shielded.text, "before\n__PROT_0__\nafter");
        assert_eq!(shielded.originals, vec!["```rust\nlet x = *y*;\n```"]);
    }

    #[test]
    fn inline_code_inside_fence_is_not_separate() {
        let input = "```\n`inner`\n```";
        let shielded = shield(input);
        assert_eq!(shielded.len(), 1);
        assert_eq!(shielded.text, "__PROT_0__");
    }

    #[test]
    fn inline_code_may_cross_lines() {
        let shielded = shield("`a\nb` and `c`");
        assert_eq!(shielded.text, "__PROT_0__ and __PROT_1__");
        assert_eq!(shielded.originals, vec!["`a\nb`", "`c`"]);
    }

    #[test]
    fn backticks_pair_in_order() {
        // the text between two spans is never taken for code
        let shielded = shield("`x\ny` and `*z*`");
        assert!(!shielded.originals.contains(&"` and `".to_string()));
        assert_eq!(shielded.originals[1], "`*z*`");
    }

    #[test]
    fn shields_math_and_environments_in_order() {
        let input = "$$x*y*z$$ then \\begin{a}*b*\\end{a} and `c`";
        let shielded = shield(input);
        assert_eq!(shielded.text, "__PROT_0__ then __PROT_1__ and __PROT_2__");
        assert_eq!(
            shielded.originals,
            vec!["$$x*y*z$$", "\\begin{a}*b*\\end{a}", "`c`"]
        );
    }

    #[test]
    fn nothing_to_shield() {
        let shielded = shield("plain *text*");
        assert!(shielded.is_empty());
        assert_eq!(shielded.text, "plain *text*");
    }

    #[test]
    fn restore_is_exact() {
        for input in [
            "",
            "no regions at all",
            "```\ncode\n```",
            "a `b` c `d` e",
            "$$\n\\begin{align}x\\end{align}\n$$",
            "unterminated ``` fence",
            "강조 `코드` 끝",
        ] {
            assert_eq!(roundtrip(input), input);
        }
    }

    #[test]
    fn literal_token_lookalikes_survive() {
        let input = "user wrote __PROT_0__ and __PROT_1`x`";
        let shielded = shield(input);
        assert!(!shielded.text.contains("user wrote __PROT_0__ and"));
        assert_eq!(shielded.restore(&shielded.text), input);
    }

    #[test]
    fn out_of_range_token_is_kept() {
        let shielded = shield("`a`");
        assert_eq!(shielded.restore("__PROT_0__ __PROT_7__"), "`a` __PROT_7__");
    }
}

//! Word and character counts for the status line.

/// Counts shown next to the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    /// Whitespace-separated tokens.
    pub words: usize,
    /// Unicode scalar values, whitespace included.
    pub chars: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            chars: text.chars().count(),
        }
    }
}

impl std::fmt::Display for TextStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} words, {} chars", self.words, self.chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts() {
        assert_eq!(TextStats::of(""), TextStats { words: 0, chars: 0 });
        assert_eq!(TextStats::of("   \n "), TextStats { words: 0, chars: 5 });
        assert_eq!(
            TextStats::of("  two words\n"),
            TextStats { words: 2, chars: 12 }
        );
        assert_eq!(TextStats::of("강조 에"), TextStats { words: 2, chars: 4 });
    }

    #[test]
    fn display() {
        assert_eq!(TextStats::of("a b").to_string(), "2 words, 3 chars");
    }
}

//! List continuation on newline.
//!
//! Called when the editor is about to insert a newline at the cursor. Only
//! the current line up to the cursor is inspected:
//! - a list item with content gets the next marker on the new line
//!   (same bullet, or the number plus one)
//! - an empty list item is removed, which ends the list
//! - anything else is left to the default newline insertion
//!
//! There's no lookback past the current line: nesting isn't tracked and
//! later items are never renumbered.
//!
//! All offsets are char offsets.

use std::sync::LazyLock;

use regex::Regex;

use crate::text::{byte_to_char, char_to_byte, find_line_start};

/// Indent, bullet glyph and spacing, then content.
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*[*+-]\s+)(.*)$").unwrap());

/// Indent, number, `.` plus spacing, then content.
static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)([0-9]+)(\.\s+)(.*)$").unwrap());

/// The marker part of a list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListMarker {
    /// `prefix` is indent, glyph and spacing together, e.g. `"  - "`.
    Bullet { prefix: String },
    /// `number` is the digits as typed; `separator` is the `.` and the
    /// spacing after it.
    Numbered {
        indent: String,
        number: String,
        separator: String,
    },
}

/// A list item line, as seen up to the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLine {
    /// Char offset where the line starts.
    pub line_start: usize,
    pub marker: ListMarker,
    /// Text after the marker, up to the cursor.
    pub content: String,
}

impl ListLine {
    /// Whether the item has nothing but whitespace after its marker.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Marker text for the line that continues this list, without the
    /// leading newline.
    pub fn next_marker(&self) -> String {
        match &self.marker {
            ListMarker::Bullet { prefix } => prefix.clone(),
            ListMarker::Numbered {
                indent,
                number,
                separator,
            } => format!("{indent}{}{separator}", increment_decimal(number)),
        }
    }
}

/// `digits + 1` in decimal, for any number of digits. Leading zeros are
/// dropped, so `"09"` gives `"10"`.
fn increment_decimal(digits: &str) -> String {
    let digits = digits.trim_start_matches('0');
    let mut out: Vec<u8> = digits.bytes().collect();
    for digit in out.iter_mut().rev() {
        if *digit == b'9' {
            *digit = b'0';
        } else {
            *digit += 1;
            return String::from_utf8_lossy(&out).into_owned();
        }
    }
    // all nines, or empty (the number was zero)
    out.insert(0, b'1');
    String::from_utf8_lossy(&out).into_owned()
}

/// What a newline at the cursor should do to the list, if anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListAction {
    /// Remove the empty item (from `line_start` to the cursor).
    Terminate { line_start: usize },
    /// Insert `insertion` (newline plus marker) at the cursor.
    Continue { insertion: String },
    /// Not in a list item; insert a plain newline.
    NoMatch,
}

/// Buffer edit for the caller to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditResult {
    /// Replace the whole buffer with `text` and put the cursor at `cursor`.
    InsertText { text: String, cursor: usize },
    /// Do nothing; the default newline insertion applies.
    Noop,
}

impl EditResult {
    /// Build the buffer edit for `action` on `text` with the cursor at
    /// `cursor`.
    pub fn from_action(text: &str, cursor: usize, action: ListAction) -> Self {
        let cursor_byte = char_to_byte(text, cursor);
        let cursor = byte_to_char(text, cursor_byte);

        match action {
            ListAction::Terminate { line_start } => {
                let start_byte = char_to_byte(text, line_start);
                let mut out = String::with_capacity(text.len());
                out.push_str(&text[..start_byte]);
                out.push_str(&text[cursor_byte..]);
                EditResult::InsertText {
                    text: out,
                    cursor: line_start,
                }
            }
            ListAction::Continue { insertion } => {
                let mut out = String::with_capacity(text.len() + insertion.len());
                out.push_str(&text[..cursor_byte]);
                out.push_str(&insertion);
                out.push_str(&text[cursor_byte..]);
                EditResult::InsertText {
                    text: out,
                    cursor: cursor + insertion.chars().count(),
                }
            }
            ListAction::NoMatch => EditResult::Noop,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, EditResult::Noop)
    }

    /// Apply to `text`, returning the new buffer and cursor. `Noop` applies
    /// the default: a plain newline at the cursor.
    pub fn apply(self, text: &str, cursor: usize) -> (String, usize) {
        match self {
            EditResult::InsertText { text, cursor } => (text, cursor),
            EditResult::Noop => {
                let cursor_byte = char_to_byte(text, cursor);
                let mut out = String::with_capacity(text.len() + 1);
                out.push_str(&text[..cursor_byte]);
                out.push('\n');
                out.push_str(&text[cursor_byte..]);
                (out, byte_to_char(text, cursor_byte) + 1)
            }
        }
    }
}

/// Classify the current line (up to the cursor) as a list item.
///
/// Bullets are checked before numbers. A cursor past the end of `text` is
/// treated as being at the end.
pub fn detect_list_line(text: &str, cursor: usize) -> Option<ListLine> {
    let cursor_byte = char_to_byte(text, cursor);
    let start_byte = find_line_start(text, cursor_byte);
    let line = &text[start_byte..cursor_byte];
    let line_start = byte_to_char(text, start_byte);

    if let Some(caps) = BULLET_RE.captures(line) {
        return Some(ListLine {
            line_start,
            marker: ListMarker::Bullet {
                prefix: caps[1].to_string(),
            },
            content: caps[2].to_string(),
        });
    }

    let caps = NUMBERED_RE.captures(line)?;
    Some(ListLine {
        line_start,
        marker: ListMarker::Numbered {
            indent: caps[1].to_string(),
            number: caps[2].to_string(),
            separator: caps[3].to_string(),
        },
        content: caps[4].to_string(),
    })
}

/// Decide what a newline at `cursor` does to the list.
pub fn list_action(text: &str, cursor: usize) -> ListAction {
    let Some(line) = detect_list_line(text, cursor) else {
        return ListAction::NoMatch;
    };

    if line.is_empty() {
        return ListAction::Terminate {
            line_start: line.line_start,
        };
    }

    ListAction::Continue {
        insertion: format!("\n{}", line.next_marker()),
    }
}

/// Handle a newline keypress at `cursor`.
pub fn on_newline(text: &str, cursor: usize) -> EditResult {
    let action = list_action(text, cursor);
    EditResult::from_action(text, cursor, action)
}

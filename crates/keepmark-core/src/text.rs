//! Offset helpers for plain `&str` buffers.
//!
//! Editor offsets are in Unicode scalar values (chars), not bytes. These
//! helpers convert between the two and find line boundaries.

/// Convert a char offset to a byte offset, clamping to the end of `text`.
pub fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Convert a byte offset to a char offset.
///
/// `byte_offset` must lie on a char boundary.
pub fn byte_to_char(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].chars().count()
}

/// Find start of the line containing `byte_offset` (byte index after the
/// last newline before it, or 0).
pub fn find_line_start(text: &str, byte_offset: usize) -> usize {
    text[..byte_offset].rfind('\n').map(|nl| nl + 1).unwrap_or(0)
}

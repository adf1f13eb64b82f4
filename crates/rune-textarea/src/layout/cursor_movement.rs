use core::ops::Range;

use super::line_breaker::{WordBoundaryKind, compute_word_boundaries};
use crate::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

/// Direction for caret movement, in visual terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementDirection {
    Left,
    Right,
    Up,
    Down,
}

/// Logical (layout-independent) caret movement helpers.
pub struct CursorMovement;

impl CursorMovement {
    /// Previous grapheme boundary, or `None` at the start of the text.
    pub fn prev_char(text: &str, byte_offset: usize) -> Option<usize> {
        prev_grapheme_boundary(text, byte_offset)
    }

    /// Next grapheme boundary, or `None` at the end of the text.
    pub fn next_char(text: &str, byte_offset: usize) -> Option<usize> {
        next_grapheme_boundary(text, byte_offset)
    }

    /// Move left by one word: to the start of the current word when inside
    /// one, otherwise to the start of the previous word.
    pub fn move_left_word(text: &str, byte_offset: usize) -> usize {
        compute_word_boundaries(text)
            .iter()
            .filter(|b| b.kind == WordBoundaryKind::Word && b.range.start < byte_offset)
            .map(|b| b.range.start)
            .last()
            .unwrap_or(0)
    }

    /// Move right by one word: to the end of the current word when inside
    /// one, otherwise to the end of the next word.
    pub fn move_right_word(text: &str, byte_offset: usize) -> usize {
        compute_word_boundaries(text)
            .iter()
            .find(|b| b.kind == WordBoundaryKind::Word && b.range.end > byte_offset)
            .map(|b| b.range.end)
            .unwrap_or(text.len())
    }

    /// Word (or run of non-word characters) under `byte_offset`.
    ///
    /// At the end of the text this is the last segment. A newline is never
    /// selected as part of a word.
    pub fn word_range_at(text: &str, byte_offset: usize) -> Range<usize> {
        let boundaries = compute_word_boundaries(text);
        let hit = boundaries
            .iter()
            .find(|b| b.range.contains(&byte_offset))
            .or_else(|| boundaries.last());
        match hit {
            Some(b) if text[b.range.clone()].contains('\n') => byte_offset..byte_offset,
            Some(b) => b.range.clone(),
            None => byte_offset..byte_offset,
        }
    }

    /// Start of the paragraph containing `byte_offset`.
    ///
    /// With `previous_if_at_start`, an offset right after a newline backs up
    /// into the previous paragraph first.
    pub fn paragraph_start(text: &str, byte_offset: usize, previous_if_at_start: bool) -> usize {
        let bytes = text.as_bytes();
        let mut pos = byte_offset.min(text.len());
        if pos > 0 && previous_if_at_start && bytes[pos - 1] == b'\n' {
            pos -= 1;
        }
        while pos > 0 && bytes[pos - 1] != b'\n' {
            pos -= 1;
        }
        pos
    }

    /// End of the paragraph containing `byte_offset`.
    ///
    /// With `go_past_initial_newline`, an offset sitting on a newline first
    /// steps into the next paragraph. With `go_past_trailing_newline`, the
    /// result lands after the newline (start of the next paragraph), which
    /// is the Windows convention; stepping past an initial newline then
    /// already completes the move.
    pub fn paragraph_end(
        text: &str,
        byte_offset: usize,
        go_past_initial_newline: bool,
        go_past_trailing_newline: bool,
    ) -> usize {
        let bytes = text.as_bytes();
        let len = bytes.len();
        let mut pos = byte_offset.min(len);
        if pos >= len {
            return pos;
        }

        let mut went_past_initial_newline = false;
        if go_past_initial_newline && bytes[pos] == b'\n' {
            pos += 1;
            went_past_initial_newline = true;
        }
        if !(go_past_trailing_newline && went_past_initial_newline) {
            while pos < len && bytes[pos] != b'\n' {
                pos += 1;
            }
            if go_past_trailing_newline && pos < len {
                pos += 1;
            }
        }
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_steps() {
        let text = "Hello \u{4e16}\u{754c}";
        assert_eq!(CursorMovement::prev_char(text, 5), Some(4));
        assert_eq!(CursorMovement::prev_char(text, 0), None);
        assert_eq!(CursorMovement::prev_char(text, 9), Some(6));
        assert_eq!(CursorMovement::next_char(text, 6), Some(9));
        assert_eq!(CursorMovement::next_char(text, text.len()), None);
    }

    #[test]
    fn test_move_left_word() {
        let text = "Hello, world! Test";

        // From middle of "world"
        assert_eq!(CursorMovement::move_left_word(text, 10), 7);
        // From start of "world"
        assert_eq!(CursorMovement::move_left_word(text, 7), 0);
        // From start
        assert_eq!(CursorMovement::move_left_word(text, 0), 0);
        // From middle of "Test"
        assert_eq!(CursorMovement::move_left_word(text, 16), 14);
    }

    #[test]
    fn test_move_right_word() {
        let text = "Hello, world! Test";

        assert_eq!(CursorMovement::move_right_word(text, 0), 5);
        assert_eq!(CursorMovement::move_right_word(text, 2), 5);
        // From end of "Hello"
        assert_eq!(CursorMovement::move_right_word(text, 5), 12);
        assert_eq!(CursorMovement::move_right_word(text, 16), text.len());
        assert_eq!(
            CursorMovement::move_right_word(text, text.len()),
            text.len()
        );
    }

    #[test]
    fn test_word_range_at() {
        let text = "Hello, world\nnext";
        assert_eq!(CursorMovement::word_range_at(text, 2), 0..5);
        assert_eq!(CursorMovement::word_range_at(text, 8), 7..12);
        assert_eq!(CursorMovement::word_range_at(text, 6), 6..7);
        assert_eq!(CursorMovement::word_range_at(text, 12), 12..12);
        assert_eq!(CursorMovement::word_range_at(text, text.len()), 13..17);
    }

    #[test]
    fn test_emoji_movement() {
        let text = "Hello \u{1F468}\u{200D}\u{1F469}\u{200D}\u{1F467} World";
        let emoji_start = 6;
        let emoji_end = text.find(" World").unwrap_or_default();

        assert_eq!(CursorMovement::next_char(text, emoji_start), Some(emoji_end));
        assert_eq!(CursorMovement::prev_char(text, emoji_end), Some(emoji_start));
    }

    #[test]
    fn test_paragraph_start() {
        let text = "ab\ncd\nef";
        assert_eq!(CursorMovement::paragraph_start(text, 4, false), 3);
        assert_eq!(CursorMovement::paragraph_start(text, 3, false), 3);
        assert_eq!(CursorMovement::paragraph_start(text, 3, true), 0);
        assert_eq!(CursorMovement::paragraph_start(text, 0, true), 0);
    }

    #[test]
    fn test_paragraph_end() {
        let text = "ab\ncd\nef";
        assert_eq!(CursorMovement::paragraph_end(text, 0, false, false), 2);
        assert_eq!(CursorMovement::paragraph_end(text, 2, false, false), 2);
        assert_eq!(CursorMovement::paragraph_end(text, 2, true, false), 5);
        assert_eq!(CursorMovement::paragraph_end(text, 0, false, true), 3);
        // stepping over the initial newline already reaches the next paragraph
        assert_eq!(CursorMovement::paragraph_end(text, 2, true, true), 3);
        assert_eq!(CursorMovement::paragraph_end(text, 7, true, true), 8);
    }
}

use core::ops::Range;

use crate::error::{Result, TextAreaError};
use crate::unicode::floor_char_boundary;

/// Editable UTF-8 text owned by the text area.
///
/// Offsets are byte offsets and always sit on `char` boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
}

/// Description of an applied replace-range mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Replaced byte range in the text *before* the edit.
    pub range: Range<usize>,
    /// Length in bytes of the inserted text.
    pub inserted_len: usize,
    /// Newlines removed by the edit.
    pub removed_newlines: usize,
    /// Newlines inserted by the edit.
    pub inserted_newlines: usize,
}

impl Edit {
    /// Map an offset from the old text into the new text.
    ///
    /// Offsets before the edit are unchanged, offsets after it shift by the
    /// length delta, and offsets touching the replaced range land after the
    /// inserted text.
    pub fn map_offset(&self, offset: usize) -> usize {
        if offset < self.range.start {
            offset
        } else if offset > self.range.end {
            offset - self.range.len() + self.inserted_len
        } else {
            self.range.start + self.inserted_len
        }
    }

    /// End of the inserted text in the new buffer.
    pub fn inserted_end(&self) -> usize {
        self.range.start + self.inserted_len
    }
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Clamp an offset into `0..=len` and onto a `char` boundary.
    pub fn clamp_offset(&self, offset: usize) -> usize {
        floor_char_boundary(&self.text, offset)
    }

    /// Validate an offset, snapping it onto a `char` boundary.
    pub fn check_offset(&self, offset: usize) -> Result<usize> {
        if offset > self.text.len() {
            return Err(TextAreaError::OutOfRange {
                offset,
                len: self.text.len(),
            });
        }
        Ok(floor_char_boundary(&self.text, offset))
    }

    /// Validate a range, snapping both ends onto `char` boundaries.
    pub fn check_range(&self, range: Range<usize>) -> Result<Range<usize>> {
        if range.start > range.end {
            return Err(TextAreaError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        let start = self.check_offset(range.start)?;
        let end = self.check_offset(range.end)?;
        Ok(start..end)
    }

    /// Replace `range` with `new_text`, failing on invalid ranges.
    pub fn try_replace(&mut self, range: Range<usize>, new_text: &str) -> Result<Edit> {
        let range = self.check_range(range)?;
        Ok(self.apply(range, new_text))
    }

    /// Clamp both ends of `range` into the text, swapping reversed ends.
    pub fn clamp_range(&self, range: Range<usize>) -> Range<usize> {
        let a = self.clamp_offset(range.start);
        let b = self.clamp_offset(range.end);
        a.min(b)..a.max(b)
    }

    /// Replace `range` with `new_text`, clamping an invalid range.
    pub fn replace(&mut self, range: Range<usize>, new_text: &str) -> Edit {
        let range = match self.check_range(range.clone()) {
            Ok(range) => range,
            Err(err) => {
                log::warn!("clamping edit: {err}");
                self.clamp_range(range)
            }
        };
        self.apply(range, new_text)
    }

    fn apply(&mut self, range: Range<usize>, new_text: &str) -> Edit {
        let removed_newlines = count_newlines(&self.text[range.clone()]);
        let inserted_newlines = count_newlines(new_text);
        self.text.replace_range(range.clone(), new_text);
        Edit {
            range,
            inserted_len: new_text.len(),
            removed_newlines,
            inserted_newlines,
        }
    }

    /// Paragraph ranges; each includes its trailing newline except the last.
    ///
    /// Always yields at least one (possibly empty) paragraph.
    pub fn paragraph_ranges(&self) -> Vec<Range<usize>> {
        paragraph_ranges(&self.text)
    }

    /// Number of paragraphs (newlines + 1).
    pub fn paragraph_count(&self) -> usize {
        count_newlines(&self.text) + 1
    }

    /// Index of the paragraph containing `offset`.
    pub fn paragraph_index_at(&self, offset: usize) -> usize {
        let offset = self.clamp_offset(offset);
        count_newlines(&self.text[..offset])
    }
}

/// Split text into paragraph ranges on `\n`.
pub fn paragraph_ranges(text: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0usize;
    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            let end = idx + ch.len_utf8();
            ranges.push(start..end);
            start = end;
        }
    }
    ranges.push(start..text.len());
    ranges
}

pub(crate) fn count_newlines(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_ranges() {
        assert_eq!(paragraph_ranges(""), vec![0..0]);
        assert_eq!(paragraph_ranges("ab\ncd"), vec![0..3, 3..5]);
        assert_eq!(paragraph_ranges("a\n\n"), vec![0..2, 2..3, 3..3]);
    }

    #[test]
    fn test_replace_reports_newlines() {
        let mut buf = TextBuffer::new("ab\ncd");
        let edit = buf.replace(1..4, "X\nY\nZ");
        assert_eq!(buf.as_str(), "aX\nY\nZd");
        assert_eq!(edit.removed_newlines, 1);
        assert_eq!(edit.inserted_newlines, 2);
        assert_eq!(edit.inserted_end(), 6);
    }

    #[test]
    fn test_try_replace_rejects_out_of_range() {
        let mut buf = TextBuffer::new("abc");
        assert_eq!(
            buf.try_replace(2..9, "x"),
            Err(TextAreaError::OutOfRange { offset: 9, len: 3 })
        );
        assert_eq!(
            buf.try_replace(2..1, "x"),
            Err(TextAreaError::InvalidRange { start: 2, end: 1 })
        );
        assert_eq!(buf.as_str(), "abc");
    }

    #[test]
    fn test_replace_clamps() {
        let mut buf = TextBuffer::new("abc");
        buf.replace(5..1, "");
        assert_eq!(buf.as_str(), "a");
    }

    #[test]
    fn test_offsets_snap_to_char_boundary() {
        let buf = TextBuffer::new("a\u{00e9}b");
        // 'é' occupies bytes 1..3
        assert_eq!(buf.clamp_offset(2), 1);
        assert_eq!(buf.check_offset(2), Ok(1));
        assert_eq!(buf.clamp_offset(99), 4);
    }

    #[test]
    fn test_map_offset() {
        let mut buf = TextBuffer::new("hello world");
        let edit = buf.replace(0..5, "hi");
        assert_eq!(edit.map_offset(0), 2);
        assert_eq!(edit.map_offset(6), 3);
        assert_eq!(edit.map_offset(11), 8);
    }

    #[test]
    fn test_paragraph_index_at() {
        let buf = TextBuffer::new("ab\ncd\n");
        assert_eq!(buf.paragraph_index_at(0), 0);
        assert_eq!(buf.paragraph_index_at(2), 0);
        assert_eq!(buf.paragraph_index_at(3), 1);
        assert_eq!(buf.paragraph_index_at(6), 2);
        assert_eq!(buf.paragraph_count(), 3);
    }
}

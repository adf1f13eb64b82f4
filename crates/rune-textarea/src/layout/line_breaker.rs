use core::ops::Range;

use unicode_linebreak::{BreakOpportunity, linebreaks};
use unicode_segmentation::UnicodeSegmentation;

use crate::metrics::MeasuredLine;
use crate::unicode::next_grapheme_boundary;

/// Kind of line break at a given position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineBreakKind {
    /// Required line break (e.g., explicit newline or end of text).
    Mandatory,
    /// Optional line break opportunity.
    Opportunity,
}

/// A line break opportunity in the text.
#[derive(Debug, Clone, Copy)]
pub struct LineBreak {
    /// Byte offset *after* the break.
    pub offset: usize,
    /// Break kind (mandatory vs optional).
    pub kind: LineBreakKind,
}

/// Kind of word boundary at a given range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordBoundaryKind {
    /// A run of word characters.
    Word,
    /// Non-word run (whitespace, punctuation, etc.).
    NonWord,
}

/// A word or non-word segment in the text.
#[derive(Debug, Clone)]
pub struct WordBoundary {
    pub range: Range<usize>,
    pub kind: WordBoundaryKind,
}

/// Compute all line break opportunities in the given text using UAX-14
/// via the `unicode-linebreak` crate.
///
/// This includes both optional and mandatory breaks, and treats the
/// end-of-text as a mandatory break.
pub fn compute_line_breaks(text: &str) -> Vec<LineBreak> {
    linebreaks(text)
        .map(|(offset, opp)| LineBreak {
            offset,
            kind: match opp {
                BreakOpportunity::Mandatory => LineBreakKind::Mandatory,
                BreakOpportunity::Allowed => LineBreakKind::Opportunity,
            },
        })
        .collect()
}

/// Enumerate word and non-word segments for the given text.
///
/// This uses `unicode-segmentation`'s word boundary logic under the
/// hood, which follows Unicode Text Segmentation (roughly UAX-29).
pub fn compute_word_boundaries(text: &str) -> Vec<WordBoundary> {
    let mut result = Vec::new();
    let mut byte_offset = 0;

    for segment in text.split_word_bounds() {
        let start = byte_offset;
        let end = start + segment.len();

        let kind = if segment.chars().any(|c| c.is_alphanumeric()) {
            WordBoundaryKind::Word
        } else {
            WordBoundaryKind::NonWord
        };

        result.push(WordBoundary {
            range: start..end,
            kind,
        });

        byte_offset = end;
    }

    result
}

/// Greedy line wrapping for a single paragraph (no newlines).
///
/// `width_of` returns the advance of a byte range of `text`. Lines break at
/// UAX-14 opportunities; trailing whitespace hangs past `max_width` and is
/// kept in the line. A word wider than `max_width` falls back to grapheme
/// boundaries, and every line takes at least one grapheme. A non-positive
/// `max_width` disables wrapping.
pub fn wrap_greedy(
    text: &str,
    max_width: f32,
    width_of: impl Fn(Range<usize>) -> f32,
) -> Vec<MeasuredLine> {
    if text.is_empty() {
        return vec![MeasuredLine {
            range: 0..0,
            width: 0.0,
        }];
    }
    if max_width <= 0.0 {
        return vec![MeasuredLine {
            range: 0..text.len(),
            width: width_of(0..text.len()),
        }];
    }

    let breaks = compute_line_breaks(text);
    let mut lines = Vec::new();
    let mut start = 0usize;

    while start < text.len() {
        // Try all break opportunities after `start`, greedily picking the
        // last that fits.
        let mut best_end = None;
        for br in breaks.iter().filter(|b| b.offset > start) {
            let visible_end = start + text[start..br.offset].trim_end().len();
            if width_of(start..visible_end) <= max_width {
                best_end = Some(br.offset);
            } else {
                break;
            }
        }

        let end = match best_end {
            Some(end) => end,
            None => {
                // Single word exceeds max_width: break between graphemes,
                // forcing at least one onto the line.
                let mut end = next_grapheme_boundary(text, start).unwrap_or(text.len());
                while let Some(next) = next_grapheme_boundary(text, end) {
                    if width_of(start..next) > max_width {
                        break;
                    }
                    end = next;
                }
                end
            }
        };

        lines.push(MeasuredLine {
            range: start..end,
            width: width_of(start..end),
        });
        start = end;
    }

    lines
}

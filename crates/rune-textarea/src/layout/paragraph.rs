use core::ops::Range;

use crate::bidi::ParagraphBidi;
use crate::error::TextAreaError;
use crate::font::{Font, ScaledFontMetrics};
use crate::metrics::{MeasuredLine, MetricsProvider};
use crate::unicode::floor_char_boundary;

use super::VisualLine;

/// Measured lines of one paragraph, independent of its position in the
/// buffer. This is the unit the metrics cache stores.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphMetrics {
    /// Wrapped lines, ranges relative to the paragraph start.
    pub lines: Vec<MeasuredLine>,
    /// Width of the paragraph laid out on a single line.
    pub natural_width: f32,
}

impl ParagraphMetrics {
    /// Measure paragraph `text` (without its newline).
    ///
    /// `paragraph` only labels diagnostics.
    pub fn measure(
        provider: &dyn MetricsProvider,
        font: &Font,
        text: &str,
        wrap_width: f32,
        paragraph: usize,
    ) -> Self {
        if text.is_empty() {
            return Self {
                lines: vec![MeasuredLine {
                    range: 0..0,
                    width: 0.0,
                }],
                natural_width: 0.0,
            };
        }

        let wrap_width = wrap_width.max(0.0);
        let measure = provider.measure(font, text, wrap_width);
        // Lines must tile the paragraph: each starts where the previous one
        // ended and the last one reaches the end of the text.
        let mut lines: Vec<MeasuredLine> = Vec::with_capacity(measure.lines.len());
        let mut start = 0usize;
        for line in measure.lines {
            let end = floor_char_boundary(text, line.range.end.max(start));
            if end > start {
                lines.push(MeasuredLine {
                    range: start..end,
                    width: line.width.max(0.0),
                });
                start = end;
            }
        }
        if let Some(last) = lines.last_mut() {
            last.range.end = text.len();
        }

        if lines.is_empty() {
            let err = TextAreaError::DegenerateLayout { paragraph };
            debug_assert!(false, "{err}");
            log::error!("{err}; using a single line");
            lines.push(MeasuredLine {
                range: 0..text.len(),
                width: measure.width.max(0.0),
            });
        }

        let natural_width = if wrap_width > 0.0 {
            provider.measure(font, text, 0.0).width.max(0.0)
        } else {
            lines.iter().map(|l| l.width).fold(0.0f32, f32::max)
        };

        Self {
            lines,
            natural_width,
        }
    }

    /// Whether these metrics were taken for a paragraph of `text_len` bytes.
    pub fn covers(&self, text_len: usize) -> bool {
        self.lines.last().map(|l| l.range.end) == Some(text_len)
    }

    /// Position the measured lines in the document.
    ///
    /// `offset` is the paragraph's first byte and `y_top` the top of its
    /// first line.
    pub fn visual_lines(
        &self,
        metrics: &ScaledFontMetrics,
        line_spacing: f32,
        paragraph_index: usize,
        offset: usize,
        y_top: f32,
    ) -> Vec<VisualLine> {
        let height = metrics.line_height() + line_spacing.max(0.0);
        let mut y = y_top;
        self.lines
            .iter()
            .map(|line| {
                let visual = VisualLine {
                    paragraph_index,
                    start_offset: offset + line.range.start,
                    end_offset: offset + line.range.end,
                    y_top: y,
                    height,
                    baseline: y + metrics.ascent,
                    width: line.width,
                };
                y += height;
                visual
            })
            .collect()
    }
}

/// Lay out one paragraph (text without its trailing newline) into visual
/// lines, positioned at the origin.
///
/// A `wrap_width` of 0 disables wrapping.
pub fn layout_paragraph(
    text: &str,
    font: &Font,
    wrap_width: f32,
    line_spacing: f32,
    provider: &dyn MetricsProvider,
) -> Vec<VisualLine> {
    ParagraphMetrics::measure(provider, font, text, wrap_width, 0).visual_lines(
        &provider.font_metrics(font),
        line_spacing,
        0,
        0,
        0.0,
    )
}

/// Placement of a paragraph within a [`super::TextLayout`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphLayout {
    /// Byte range, trailing newline included.
    pub range: Range<usize>,
    /// End of the visible text (the newline position, if any).
    pub text_end: usize,
    /// Index of the paragraph's first visual line.
    pub first_line: usize,
    /// Number of visual lines; always at least one.
    pub line_count: usize,
    /// Width of the paragraph on a single line.
    pub natural_width: f32,
    pub bidi: ParagraphBidi,
}

impl ParagraphLayout {
    /// Whether the paragraph ends with a hard newline.
    pub fn has_newline(&self) -> bool {
        self.text_end < self.range.end
    }

    pub fn lines(&self) -> Range<usize> {
        self.first_line..self.first_line + self.line_count
    }
}

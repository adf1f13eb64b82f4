use core::ops::Range;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::font::{Font, ScaledFontMetrics};
use crate::layout::line_breaker::wrap_greedy;
use crate::unicode::floor_char_boundary;

use super::{CharHit, MetricsProvider, TextMeasure};

/// Fixed-advance metrics: every grapheme takes `max(1, display width)` cells.
///
/// Cell width and vertical metrics are expressed in ems, so results scale
/// with [`Font::size`]. The family is ignored. Deterministic and font-free,
/// which makes it the provider of choice for tests and headless hosts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    cell_em: f32,
    ascent_em: f32,
    descent_em: f32,
    line_gap_em: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            cell_em: 0.6,
            ascent_em: 0.8,
            descent_em: 0.2,
            line_gap_em: 0.0,
        }
    }
}

impl MonospaceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the advance of one cell, in ems.
    pub fn with_cell_em(mut self, cell_em: f32) -> Self {
        self.cell_em = cell_em.max(0.0);
        self
    }

    /// Set the vertical metrics, in ems.
    pub fn with_vertical_em(mut self, ascent_em: f32, descent_em: f32, line_gap_em: f32) -> Self {
        self.ascent_em = ascent_em;
        self.descent_em = descent_em;
        self.line_gap_em = line_gap_em;
        self
    }

    /// Advance of one cell in pixels.
    pub fn cell_width(&self, font: &Font) -> f32 {
        self.cell_em * font.size
    }

    fn cells(grapheme: &str) -> usize {
        grapheme.width().max(1)
    }

    fn width_of(&self, font: &Font, text: &str) -> f32 {
        let cells: usize = text.graphemes(true).map(Self::cells).sum();
        cells as f32 * self.cell_width(font)
    }
}

impl MetricsProvider for MonospaceMetrics {
    fn font_metrics(&self, font: &Font) -> ScaledFontMetrics {
        ScaledFontMetrics {
            ascent: self.ascent_em * font.size,
            descent: self.descent_em * font.size,
            line_gap: self.line_gap_em * font.size,
            font_size: font.size,
        }
    }

    fn measure(&self, font: &Font, text: &str, wrap_width: f32) -> TextMeasure {
        let lines = wrap_greedy(text, wrap_width, |range: Range<usize>| {
            self.width_of(font, &text[range])
        });
        TextMeasure::from_lines(lines, self.font_metrics(font).line_height())
    }

    fn hit_test_char(&self, font: &Font, text: &str, x: f32) -> CharHit {
        let cell = self.cell_width(font);
        let mut left = 0.0f32;
        let mut last = None;
        for (idx, g) in text.grapheme_indices(true) {
            let advance = Self::cells(g) as f32 * cell;
            if x < left + advance {
                return CharHit::new(idx, x - left < advance / 2.0);
            }
            left += advance;
            last = Some(idx);
        }
        match last {
            Some(idx) => CharHit::new(idx, false),
            None => CharHit::new(0, true),
        }
    }

    fn caret_x(&self, font: &Font, text: &str, index: usize) -> f32 {
        let index = floor_char_boundary(text, index);
        self.width_of(font, &text[..index])
    }
}

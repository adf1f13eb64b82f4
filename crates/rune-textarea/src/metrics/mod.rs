//! Measurement services consumed by the layout engine.
//!
//! A [`MetricsProvider`] answers three questions for a font and a string:
//! how tall a line is, how the string wraps at a given width, and which
//! character sits under a horizontal position. Layout never talks to fonts
//! directly.

pub mod monospace;
pub mod shaped;

use core::fmt;
use core::ops::Range;

pub use monospace::MonospaceMetrics;
pub use shaped::ShapedMetrics;

use crate::font::{Font, ScaledFontMetrics};
use crate::unicode::floor_char_boundary;

/// One wrapped line reported by [`MetricsProvider::measure`].
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredLine {
    /// Byte range of the line within the measured text.
    pub range: Range<usize>,
    /// Advance width of the line, trailing whitespace included.
    pub width: f32,
}

/// Result of measuring a string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextMeasure {
    /// Widest line.
    pub width: f32,
    /// Sum of line heights.
    pub height: f32,
    /// Wrapped lines in logical order.
    pub lines: Vec<MeasuredLine>,
}

impl TextMeasure {
    /// Assemble a measure from wrapped lines sharing one line height.
    pub fn from_lines(lines: Vec<MeasuredLine>, line_height: f32) -> Self {
        let width = lines.iter().map(|l| l.width).fold(0.0f32, f32::max);
        Self {
            width,
            height: line_height * lines.len() as f32,
            lines,
        }
    }
}

/// Raw character hit inside a single line of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharHit {
    /// Byte offset of the character (cluster) that was hit.
    pub char_index: usize,
    /// Whether the hit landed on the leading half of the character.
    pub leading: bool,
}

impl CharHit {
    pub fn new(char_index: usize, leading: bool) -> Self {
        Self {
            char_index,
            leading,
        }
    }
}

/// Font-aware measurement service.
///
/// Implementations must be pure functions of their inputs: the same font,
/// text and wrap width always produce the same answer, which is what lets
/// the layout cache measured paragraphs.
pub trait MetricsProvider: fmt::Debug {
    /// Vertical metrics for `font`, in pixels.
    fn font_metrics(&self, font: &Font) -> ScaledFontMetrics;

    /// Measure `text`, wrapping at `wrap_width` when it is positive.
    ///
    /// `text` never contains a newline.
    fn measure(&self, font: &Font, text: &str, wrap_width: f32) -> TextMeasure;

    /// Character under horizontal position `x` of single-line `text`.
    ///
    /// Positions before the text hit the first character's leading half and
    /// positions past it hit the last character's trailing half. Empty text
    /// reports `(0, leading)`.
    fn hit_test_char(&self, font: &Font, text: &str, x: f32) -> CharHit;

    /// Pen position of the insertion point `index` within single-line `text`.
    fn caret_x(&self, font: &Font, text: &str, index: usize) -> f32 {
        let index = floor_char_boundary(text, index);
        self.measure(font, &text[..index], 0.0).width
    }
}

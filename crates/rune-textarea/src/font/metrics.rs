/// Font-level metrics in font units.
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    /// Ascent above baseline (positive).
    pub ascent: f32,
    /// Descent below baseline (positive).
    pub descent: f32,
    /// Line gap (leading).
    pub line_gap: f32,
    /// Units per em.
    pub units_per_em: u16,
}

impl FontMetrics {
    /// Calculate line height (ascent + descent + line_gap).
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.line_gap
    }

    /// Scale metrics to pixel size, where `font_size` is in logical pixels
    /// (px per em).
    pub fn scale_to_pixels(&self, font_size: f32) -> ScaledFontMetrics {
        let scale = if self.units_per_em != 0 {
            font_size / self.units_per_em as f32
        } else {
            1.0
        };
        ScaledFontMetrics {
            ascent: self.ascent * scale,
            descent: self.descent * scale,
            line_gap: self.line_gap * scale,
            font_size,
        }
    }
}

/// Scaled font metrics in pixels.
///
/// This is also the vertical metrics record returned by every
/// metrics provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledFontMetrics {
    pub ascent: f32,
    pub descent: f32,
    pub line_gap: f32,
    pub font_size: f32,
}

impl ScaledFontMetrics {
    /// Height of one line box: ascent + descent + line gap, never negative.
    pub fn line_height(&self) -> f32 {
        (self.ascent.max(0.0) + self.descent.max(0.0) + self.line_gap.max(0.0)).max(0.0)
    }
}

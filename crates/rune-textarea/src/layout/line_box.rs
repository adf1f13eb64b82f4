use core::ops::Range;

/// One visual (wrapped) line of a paragraph.
///
/// Offsets are byte offsets into the whole buffer. `end_offset` is the end
/// of the visible text: a paragraph's newline never belongs to a line.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualLine {
    /// Index of the owning paragraph.
    pub paragraph_index: usize,
    /// First byte of the line.
    pub start_offset: usize,
    /// End of the line's visible text.
    pub end_offset: usize,
    /// Y position of the line box top in content coordinates.
    pub y_top: f32,
    /// Total height of the line box in pixels.
    pub height: f32,
    /// Y position of the baseline in content coordinates.
    pub baseline: f32,
    /// Advance width of the line's text in pixels.
    pub width: f32,
}

impl VisualLine {
    pub fn range(&self) -> Range<usize> {
        self.start_offset..self.end_offset
    }

    pub fn is_empty(&self) -> bool {
        self.start_offset == self.end_offset
    }

    /// Line box bottom Y position.
    pub fn bottom_y(&self) -> f32 {
        self.y_top + self.height
    }

    pub fn mid_y(&self) -> f32 {
        self.y_top + self.height / 2.0
    }
}

use core::ops::Range;

/// A selection between a fixed anchor and the moving caret end.
///
/// Both ends are byte offsets and may be in any order; the selected range
/// is always reported in logical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// The anchor point where the selection started.
    /// This is the fixed end when extending the selection.
    anchor: usize,
    /// The caret end, which moves when the selection is extended.
    caret: usize,
}

impl Selection {
    /// Create a new selection from anchor to caret position.
    pub fn new(anchor: usize, caret: usize) -> Self {
        Self { anchor, caret }
    }

    /// Get the anchor position (where selection started).
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// Get the caret position (moving end of selection).
    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Get the selection range in logical order (start..end).
    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.caret)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.caret)
    }

    /// Check if the selection is collapsed (no range selected).
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.caret
    }

    /// Move the caret end, keeping the anchor fixed.
    pub fn extend_to(&mut self, offset: usize) {
        self.caret = offset;
    }

    /// Collapse the selection at a new position.
    pub fn move_to(&mut self, offset: usize) {
        self.anchor = offset;
        self.caret = offset;
    }

    /// Map both ends through `f` (used when the text changes).
    pub fn map(self, f: impl Fn(usize) -> usize) -> Self {
        Self::new(f(self.anchor), f(self.caret))
    }
}

/// Which side of an ambiguous offset the caret belongs to.
///
/// The two sides differ at soft-wrap boundaries, where the same offset is
/// both the end of one line and the start of the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bias {
    /// Leading edge of the character at the offset (start of the next line
    /// at a wrap, end of the line when that character is a newline).
    #[default]
    Leading,
    /// Trailing edge of the character before the offset (end of the
    /// previous line at a wrap).
    Trailing,
}

/// Caret position plus the horizontal target remembered across vertical
/// moves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CaretState {
    /// Byte offset; always on a grapheme boundary.
    pub offset: usize,
    pub bias: Bias,
    /// Sticky x for consecutive vertical moves.
    pub target_x: Option<f32>,
}

impl CaretState {
    pub fn new(offset: usize, bias: Bias) -> Self {
        Self {
            offset,
            bias,
            target_x: None,
        }
    }
}

//! Error types for the text area engine.

use thiserror::Error;

/// Result type for fallible text area operations.
pub type Result<T> = std::result::Result<T, TextAreaError>;

/// Errors reported by the strict entry points of the engine.
///
/// The lenient entry points clamp instead of failing and only log these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TextAreaError {
    /// Offset outside `0..=len` of the buffer.
    #[error("offset {offset} is outside the buffer (length {len})")]
    OutOfRange { offset: usize, len: usize },

    /// Range whose start lies after its end.
    #[error("invalid range {start}..{end}")]
    InvalidRange { start: usize, end: usize },

    /// A paragraph produced no visual lines.
    #[error("paragraph {paragraph} produced no visual lines")]
    DegenerateLayout { paragraph: usize },
}

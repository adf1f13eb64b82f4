//! Bidirectional (BiDi) text support built on `unicode-bidi`.
//!
//! Only paragraph-level analysis is performed: the base direction decides
//! which way "forward" points for horizontal caret movement. Visual
//! reordering of mixed runs is left to the metrics provider.

pub mod levels;

pub use levels::{BaseDirection, ParagraphBidi, ParagraphDirection};

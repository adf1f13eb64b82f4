//! Unicode utilities for rune-textarea.
//!
//! Grapheme cluster navigation keeps caret offsets off the inside of
//! combining sequences, emoji/ZWJ sequences and other multi-code-point
//! clusters.

pub mod graphemes;

pub use graphemes::{
    floor_char_boundary,
    is_grapheme_boundary,
    next_grapheme_boundary,
    prev_grapheme_boundary,
    snap_to_grapheme,
};

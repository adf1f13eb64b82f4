use unicode_segmentation::GraphemeCursor;

/// Clamp `offset` to `0..=text.len()` and move it back onto a `char` boundary.
pub fn floor_char_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Returns `true` if `offset` is at a grapheme cluster boundary.
///
/// Offsets past the end or inside a `char` are never boundaries.
pub fn is_grapheme_boundary(text: &str, offset: usize) -> bool {
    if offset > text.len() || !text.is_char_boundary(offset) {
        return false;
    }
    GraphemeCursor::new(offset, text.len(), true)
        .is_boundary(text, 0)
        .unwrap_or(true)
}

/// Find the previous grapheme cluster boundary before `offset`.
///
/// If `offset` lies inside a grapheme cluster, this returns the start
/// of that cluster. If `offset` is exactly at a cluster boundary,
/// this returns the start of the previous cluster. Returns `None`
/// when there is no previous cluster.
pub fn prev_grapheme_boundary(text: &str, offset: usize) -> Option<usize> {
    let offset = floor_char_boundary(text, offset);
    if offset == 0 {
        return None;
    }
    GraphemeCursor::new(offset, text.len(), true)
        .prev_boundary(text, 0)
        .ok()
        .flatten()
}

/// Find the next grapheme cluster boundary after `offset`.
///
/// If `offset` lies inside a grapheme cluster, this returns the end
/// of that cluster. If `offset` is exactly at a cluster boundary,
/// this returns the end of the next cluster. Returns `None` when
/// there is no next cluster.
pub fn next_grapheme_boundary(text: &str, offset: usize) -> Option<usize> {
    let offset = floor_char_boundary(text, offset);
    if offset >= text.len() {
        return None;
    }
    GraphemeCursor::new(offset, text.len(), true)
        .next_boundary(text, 0)
        .ok()
        .flatten()
}

/// Move `offset` back to the start of the grapheme cluster containing it.
pub fn snap_to_grapheme(text: &str, offset: usize) -> usize {
    let offset = floor_char_boundary(text, offset);
    if is_grapheme_boundary(text, offset) {
        offset
    } else {
        prev_grapheme_boundary(text, offset).unwrap_or(0)
    }
}

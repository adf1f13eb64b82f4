//! Caret and selection tracking.
//!
//! [`CaretTracker`] owns the caret offset, its bias, the selection anchor
//! and the horizontal target remembered across vertical moves. Navigation
//! runs against a [`TextLayout`]; caret and selection shapes are cached
//! against the tracker revision and the layout version and rebuilt lazily.

use core::ops::Range;

use crate::buffer::Edit;
use crate::geometry::Rect;
use crate::layout::{
    Bias, CaretState, CursorMovement, HitTestResult, MovementDirection, Point, Selection,
    TextLayout,
};
use crate::metrics::CharHit;
use crate::unicode::snap_to_grapheme;

/// Observable tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// Caret without a selection.
    Idle { offset: usize, bias: Bias },
    /// Non-empty selection from `anchor` to the caret.
    Selecting { anchor: usize, caret: usize },
}

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Moved { offset: usize, bias: Bias },
    /// The caret is already as far as it can go (buffer start or end, or no
    /// line in the requested direction).
    NoMovementPossible,
}

impl Motion {
    pub fn moved(&self) -> bool {
        matches!(self, Motion::Moved { .. })
    }
}

/// Navigation commands understood by [`crate::TextArea::move_caret`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Left,
    Right,
    Up,
    Down,
    WordLeft,
    WordRight,
    LineStart,
    LineEnd,
    ParagraphStart,
    ParagraphEnd,
    PageUp,
    PageDown,
    DocumentStart,
    DocumentEnd,
}

#[derive(Debug, Clone)]
struct Shapes {
    revision: u64,
    layout_version: u64,
    caret_width: u32,
    caret: Rect,
    selection: Vec<Rect>,
}

#[derive(Debug, Clone, Default)]
pub struct CaretTracker {
    selection: Selection,
    caret: CaretState,
    /// Bumped on every state transition.
    revision: u64,
    shapes: Option<Shapes>,
}

impl CaretTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TrackerState {
        if self.selection.is_collapsed() {
            TrackerState::Idle {
                offset: self.caret.offset,
                bias: self.caret.bias,
            }
        } else {
            TrackerState::Selecting {
                anchor: self.selection.anchor(),
                caret: self.selection.caret(),
            }
        }
    }

    pub fn caret(&self) -> CaretState {
        self.caret
    }

    pub fn offset(&self) -> usize {
        self.caret.offset
    }

    pub fn bias(&self) -> Bias {
        self.caret.bias
    }

    pub fn anchor(&self) -> usize {
        self.selection.anchor()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Selected range in logical order; empty when idle.
    pub fn selected_range(&self) -> Range<usize> {
        self.selection.range()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    /// Place the caret, dropping any selection.
    pub fn position_caret(&mut self, offset: usize, bias: Bias) {
        self.selection.move_to(offset);
        self.caret = CaretState::new(offset, bias);
        self.bump();
    }

    /// Move the caret end of the selection, anchoring at the current caret
    /// when idle.
    pub fn extend_selection(&mut self, offset: usize) {
        self.selection.extend_to(offset);
        self.caret = CaretState::new(offset, Bias::Leading);
        self.bump();
    }

    /// Select `anchor..caret`; equal ends leave the tracker idle.
    pub fn select_range(&mut self, anchor: usize, caret: usize) {
        self.selection = Selection::new(anchor, caret);
        self.caret = CaretState::new(caret, Bias::Leading);
        self.bump();
    }

    /// Carry the caret and selection across a text edit, snapping onto
    /// grapheme boundaries of the new `text`.
    pub fn text_changed(&mut self, edit: &Edit, text: &str) {
        let map = |offset| snap_to_grapheme(text, edit.map_offset(offset));
        self.selection = self.selection.map(map);
        self.caret = CaretState::new(self.selection.caret(), Bias::Leading);
        self.bump();
    }

    /// Move to `offset`/`bias`, extending or collapsing the selection.
    /// Resets the sticky target.
    fn apply(&mut self, offset: usize, bias: Bias, extend: bool) -> Motion {
        let before = (self.selection, self.caret.offset, self.caret.bias);
        if extend {
            self.selection.extend_to(offset);
        } else {
            self.selection.move_to(offset);
        }
        self.caret = CaretState::new(offset, bias);
        if before == (self.selection, offset, bias) {
            return Motion::NoMovementPossible;
        }
        self.bump();
        Motion::Moved { offset, bias }
    }

    fn caret_rect(&self, layout: &TextLayout) -> Rect {
        layout.caret_rect(self.caret.offset, self.caret.bias, 0.0)
    }

    /// Hit `delta_lines` lines away from the caret at `x` (the sticky
    /// target, or the caret x when none is remembered). Accepted only when
    /// the found line lies strictly on the requested side; zero deltas are
    /// always accepted.
    fn vertical_target(
        &self,
        layout: &TextLayout,
        delta_lines: i32,
        x: Option<f32>,
    ) -> Option<(HitTestResult, f32)> {
        let caret = self.caret_rect(layout);
        let x = x.or(self.caret.target_x).unwrap_or(caret.x);
        let caret_mid = caret.mid_y();
        let target_y = (caret_mid + delta_lines as f32 * layout.line_height()).max(0.0);

        let hit = layout.hit_test(Point::new(x, target_y));
        let found_mid = layout.lines()[hit.line_index].mid_y();
        let accepted = match delta_lines {
            0 => true,
            d if d > 0 => found_mid > caret_mid,
            _ => found_mid < caret_mid,
        };
        accepted.then_some((hit, x))
    }

    /// Move `delta_lines` visual lines up (negative) or down, keeping the
    /// horizontal target across consecutive calls.
    pub fn move_vertical(&mut self, layout: &TextLayout, delta_lines: i32, extend: bool) -> Motion {
        let Some((hit, x)) = self.vertical_target(layout, delta_lines, None) else {
            return Motion::NoMovementPossible;
        };
        let motion = self.apply(hit.offset, hit.bias, extend);
        self.caret.target_x = Some(x);
        motion
    }

    /// Move one position left or right in visual order.
    pub fn move_horizontal(
        &mut self,
        layout: &TextLayout,
        direction: MovementDirection,
        extend: bool,
    ) -> Motion {
        let CaretState { offset, bias, .. } = self.caret;
        let right = direction == MovementDirection::Right;
        // Right-to-left lines are mirrored, so visual right is logically
        // backward there.
        let forward = right != layout.is_rtl_at(offset);

        // Look just beside the caret on the requested side.
        let caret = self.caret_rect(layout);
        let beside_x = if right { caret.x + 0.5 } else { caret.x - 0.5 };
        let (line_index, hit) = layout.hit_char(Point::new(beside_x, caret.mid_y()));
        let bounds = layout.bounds_of(hit.char_index);
        let beside = if right {
            bounds.max_x() > caret.x
        } else {
            bounds.min_x() < caret.x
        };
        if beside {
            let across = layout.resolve_hit(line_index, CharHit::new(hit.char_index, !hit.leading));
            if (across.offset, across.bias) != (offset, bias) {
                return self.apply(across.offset, across.bias, extend);
            }
        }

        // Off the edge of the line: continue at the logical start of the
        // next line or the logical end of the previous one.
        let delta = if forward { 1 } else { -1 };
        let target_line = layout
            .line_index_at(offset, bias)
            .checked_add_signed(delta as isize)
            .filter(|&index| index < layout.lines().len());
        if let Some(target_line) = target_line {
            let edge_x = layout.line_edge_x(target_line, forward);
            if let Some((hit, _)) = self.vertical_target(layout, delta, Some(edge_x)) {
                if hit.offset != offset {
                    return self.apply(hit.offset, hit.bias, extend);
                }
            }
        }

        let text = layout.text();
        let next = if forward {
            CursorMovement::next_char(text, offset)
        } else {
            CursorMovement::prev_char(text, offset)
        };
        match next {
            Some(next) => self.apply(next, Bias::Leading, extend),
            None => {
                self.caret.target_x = None;
                Motion::NoMovementPossible
            }
        }
    }

    /// Start of the caret's visual line.
    pub fn line_start(&mut self, layout: &TextLayout, extend: bool) -> Motion {
        self.line_edge(layout, true, extend)
    }

    /// End of the caret's visual line.
    pub fn line_end(&mut self, layout: &TextLayout, extend: bool) -> Motion {
        self.line_edge(layout, false, extend)
    }

    fn line_edge(&mut self, layout: &TextLayout, start: bool, extend: bool) -> Motion {
        let line_index = layout.line_index_at(self.caret.offset, self.caret.bias);
        let x = layout.line_edge_x(line_index, start);
        match self.vertical_target(layout, 0, Some(x)) {
            Some((hit, _)) => self.apply(hit.offset, hit.bias, extend),
            None => Motion::NoMovementPossible,
        }
    }

    pub fn paragraph_start(
        &mut self,
        layout: &TextLayout,
        previous_if_at_start: bool,
        extend: bool,
    ) -> Motion {
        let pos = CursorMovement::paragraph_start(layout.text(), self.caret.offset, previous_if_at_start);
        self.apply(pos, Bias::Leading, extend)
    }

    pub fn paragraph_end(
        &mut self,
        layout: &TextLayout,
        go_past_initial_newline: bool,
        go_past_trailing_newline: bool,
        extend: bool,
    ) -> Motion {
        let pos = CursorMovement::paragraph_end(
            layout.text(),
            self.caret.offset,
            go_past_initial_newline,
            go_past_trailing_newline,
        );
        self.apply(pos, Bias::Leading, extend)
    }

    /// Move by one word in visual direction.
    pub fn move_word(
        &mut self,
        layout: &TextLayout,
        direction: MovementDirection,
        extend: bool,
    ) -> Motion {
        let offset = self.caret.offset;
        let forward = (direction == MovementDirection::Right) != layout.is_rtl_at(offset);
        let pos = if forward {
            CursorMovement::move_right_word(layout.text(), offset)
        } else {
            CursorMovement::move_left_word(layout.text(), offset)
        };
        self.apply(pos, Bias::Leading, extend)
    }

    /// Move a page worth of lines (at least one).
    pub fn move_page(
        &mut self,
        layout: &TextLayout,
        viewport_height: f32,
        down: bool,
        extend: bool,
    ) -> Motion {
        let line_height = layout.line_height();
        let lines = if line_height > 0.0 {
            ((viewport_height / line_height).floor() as i32).max(1)
        } else {
            1
        };
        self.move_vertical(layout, if down { lines } else { -lines }, extend)
    }

    pub fn document_start(&mut self, extend: bool) -> Motion {
        self.apply(0, Bias::Leading, extend)
    }

    pub fn document_end(&mut self, layout: &TextLayout, extend: bool) -> Motion {
        self.apply(layout.text().len(), Bias::Leading, extend)
    }

    fn refresh_shapes(&mut self, layout: &TextLayout, layout_version: u64, caret_width: f32) {
        let caret_width_bits = caret_width.to_bits();
        let fresh = self.shapes.as_ref().is_some_and(|s| {
            s.revision == self.revision
                && s.layout_version == layout_version
                && s.caret_width == caret_width_bits
        });
        if fresh {
            return;
        }
        self.shapes = Some(Shapes {
            revision: self.revision,
            layout_version,
            caret_width: caret_width_bits,
            caret: layout.caret_rect(self.caret.offset, self.caret.bias, caret_width),
            selection: layout.selection_rects(self.selection.range()),
        });
    }

    /// Caret bar, rebuilt only when the tracker or the layout changed.
    pub fn caret_shape(&mut self, layout: &TextLayout, layout_version: u64, caret_width: f32) -> Rect {
        self.refresh_shapes(layout, layout_version, caret_width);
        self.shapes.as_ref().map_or_else(
            || layout.caret_rect(self.caret.offset, self.caret.bias, caret_width),
            |s| s.caret,
        )
    }

    /// Selection highlight rectangles, rebuilt only when the tracker or the
    /// layout changed.
    pub fn selection_shapes(
        &mut self,
        layout: &TextLayout,
        layout_version: u64,
        caret_width: f32,
    ) -> &[Rect] {
        self.refresh_shapes(layout, layout_version, caret_width);
        self.shapes.as_ref().map_or(&[], |s| s.selection.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::font::Font;
    use crate::layout::LayoutOptions;
    use crate::metrics::MonospaceMetrics;

    fn layout(text: &str, wrap_width: f32) -> TextLayout {
        TextLayout::new(
            text,
            Font::new("monospace", 10.0),
            Arc::new(MonospaceMetrics::new().with_cell_em(1.0)),
            LayoutOptions {
                wrap_width,
                ..LayoutOptions::default()
            },
        )
    }

    fn tracker_at(offset: usize) -> CaretTracker {
        let mut tracker = CaretTracker::new();
        tracker.position_caret(offset, Bias::Leading);
        tracker
    }

    #[test]
    fn state_transitions() {
        let mut tracker = tracker_at(2);
        assert_eq!(
            tracker.state(),
            TrackerState::Idle {
                offset: 2,
                bias: Bias::Leading
            }
        );
        tracker.extend_selection(5);
        assert_eq!(tracker.state(), TrackerState::Selecting { anchor: 2, caret: 5 });
        tracker.extend_selection(1);
        assert_eq!(tracker.state(), TrackerState::Selecting { anchor: 2, caret: 1 });
        tracker.select_range(4, 4);
        assert!(matches!(tracker.state(), TrackerState::Idle { offset: 4, .. }));
        tracker.position_caret(0, Bias::Trailing);
        assert_eq!(tracker.selected_range(), 0..0);
    }

    #[test]
    fn sticky_target_survives_short_line() {
        let layout = layout("long line\nab\nlong line", 0.0);
        let mut tracker = tracker_at(7);

        assert!(tracker.move_vertical(&layout, 1, false).moved());
        assert_eq!((tracker.offset(), tracker.bias()), (12, Bias::Leading));
        assert!(tracker.move_vertical(&layout, 1, false).moved());
        assert_eq!(tracker.offset(), 20);

        // a horizontal move forgets the target
        tracker.move_horizontal(&layout, MovementDirection::Left, false);
        assert_eq!(tracker.caret().target_x, None);
    }

    #[test]
    fn vertical_move_at_edges_is_refused() {
        let layout = layout("ab\ncd", 0.0);
        let mut tracker = tracker_at(1);
        assert_eq!(tracker.move_vertical(&layout, -1, false), Motion::NoMovementPossible);
        tracker.position_caret(4, Bias::Leading);
        assert_eq!(tracker.move_vertical(&layout, 1, false), Motion::NoMovementPossible);
        assert_eq!(tracker.offset(), 4);
    }

    #[test]
    fn horizontal_moves_wrap_across_lines() {
        let layout = layout("ab\ncd", 0.0);
        let mut tracker = tracker_at(2);
        tracker.move_horizontal(&layout, MovementDirection::Right, false);
        assert_eq!((tracker.offset(), tracker.bias()), (3, Bias::Leading));
        tracker.move_horizontal(&layout, MovementDirection::Left, false);
        assert_eq!(tracker.offset(), 2);
        tracker.move_horizontal(&layout, MovementDirection::Left, false);
        assert_eq!(tracker.offset(), 1);
    }

    #[test]
    fn horizontal_moves_stop_at_buffer_ends() {
        let layout = layout("ab", 0.0);
        let mut tracker = tracker_at(0);
        assert_eq!(
            tracker.move_horizontal(&layout, MovementDirection::Left, false),
            Motion::NoMovementPossible
        );
        tracker.position_caret(2, Bias::Leading);
        assert_eq!(
            tracker.move_horizontal(&layout, MovementDirection::Right, false),
            Motion::NoMovementPossible
        );
    }

    #[test]
    fn right_across_soft_wrap() {
        // "hello " | "world"
        let layout = layout("hello world", 50.0);
        let mut tracker = tracker_at(5);
        tracker.move_horizontal(&layout, MovementDirection::Right, false);
        assert_eq!((tracker.offset(), tracker.bias()), (6, Bias::Trailing));
        tracker.move_horizontal(&layout, MovementDirection::Right, false);
        assert_eq!(tracker.offset(), 7);
        tracker.move_horizontal(&layout, MovementDirection::Left, false);
        assert_eq!((tracker.offset(), tracker.bias()), (6, Bias::Leading));
    }

    #[test]
    fn arrows_follow_mirrored_rtl_lines() {
        let layout = layout("\u{05d0}\u{05d1}\u{05d2}", 0.0);
        let mut tracker = tracker_at(2);
        assert_eq!(tracker.caret_shape(&layout, 1, 1.0).x, 20.0);

        // visual right is the logical start of the paragraph
        assert!(tracker.move_horizontal(&layout, MovementDirection::Right, false).moved());
        assert_eq!(tracker.offset(), 0);
        assert_eq!(tracker.caret_shape(&layout, 1, 1.0).x, 30.0);
        assert_eq!(
            tracker.move_horizontal(&layout, MovementDirection::Right, false),
            Motion::NoMovementPossible
        );

        tracker.move_horizontal(&layout, MovementDirection::Left, false);
        assert_eq!(tracker.caret_shape(&layout, 1, 1.0).x, 20.0);
        tracker.move_horizontal(&layout, MovementDirection::Left, false);
        assert_eq!(tracker.offset(), 4);
        assert_eq!(tracker.caret_shape(&layout, 1, 1.0).x, 10.0);

        tracker.line_start(&layout, false);
        assert_eq!((tracker.offset(), tracker.caret_shape(&layout, 1, 1.0).x), (0, 30.0));
    }

    #[test]
    fn horizontal_moves_skip_clusters() {
        let layout = layout("e\u{0301}x", 0.0);
        let mut tracker = tracker_at(0);
        tracker.move_horizontal(&layout, MovementDirection::Right, false);
        assert_eq!(tracker.offset(), 3);
    }

    #[test]
    fn line_edges_at_wrap() {
        let layout = layout("hello world", 50.0);
        let mut tracker = tracker_at(2);
        tracker.line_end(&layout, false);
        assert_eq!((tracker.offset(), tracker.bias()), (6, Bias::Trailing));
        tracker.position_caret(8, Bias::Leading);
        tracker.line_start(&layout, true);
        assert_eq!((tracker.offset(), tracker.bias()), (6, Bias::Leading));
        assert_eq!(tracker.selected_range(), 6..8);
        assert_eq!(tracker.caret().target_x, None);
    }

    #[test]
    fn line_end_stops_before_newline() {
        let layout = layout("ab\ncd", 0.0);
        let mut tracker = tracker_at(0);
        tracker.line_end(&layout, false);
        assert_eq!((tracker.offset(), tracker.bias()), (2, Bias::Leading));
    }

    #[test]
    fn page_moves_by_viewport() {
        let layout = layout("a\nb\nc\nd\ne", 0.0);
        let mut tracker = tracker_at(0);
        tracker.move_page(&layout, 25.0, true, false);
        assert_eq!(tracker.offset(), 4);
        tracker.move_page(&layout, 5.0, false, false);
        assert_eq!(tracker.offset(), 2);
    }

    #[test]
    fn word_and_document_moves() {
        let layout = layout("one two\nthree", 0.0);
        let mut tracker = tracker_at(0);
        tracker.move_word(&layout, MovementDirection::Right, false);
        assert_eq!(tracker.offset(), 3);
        tracker.move_word(&layout, MovementDirection::Right, false);
        assert_eq!(tracker.offset(), 7);
        tracker.move_word(&layout, MovementDirection::Left, true);
        assert_eq!(tracker.selected_range(), 4..7);
        tracker.document_end(&layout, false);
        assert_eq!(tracker.offset(), 13);
        tracker.document_start(true);
        assert_eq!(tracker.selected_range(), 0..13);
        assert_eq!(tracker.document_start(true), Motion::NoMovementPossible);
    }

    #[test]
    fn shapes_rebuild_lazily() {
        let layout = layout("ab\ncd", 0.0);
        let mut tracker = tracker_at(1);
        let first = tracker.caret_shape(&layout, 1, 1.0);
        assert_eq!(first, Rect::new(10.0, 0.0, 1.0, 10.0));

        tracker.select_range(4, 1);
        assert_eq!(tracker.selection_shapes(&layout, 1, 1.0).len(), 2);
        let caret = tracker.caret_shape(&layout, 1, 1.0);
        assert_eq!(caret, Rect::new(10.0, 0.0, 1.0, 10.0));
    }

    #[test]
    fn edits_move_the_caret() {
        let mut tracker = tracker_at(4);
        let edit = Edit {
            range: 0..2,
            inserted_len: 5,
            removed_newlines: 0,
            inserted_newlines: 0,
        };
        tracker.text_changed(&edit, "xxxxxabcdef");
        assert_eq!(tracker.offset(), 7);
    }
}

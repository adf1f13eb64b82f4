//! Host-facing facade tying buffer, layout, caret tracker, scroller and
//! metrics cache together.
//!
//! State is pulled lazily: mutations only mark the layout dirty, and the
//! next geometry query rebuilds it from the cache. Queries that may rebuild
//! therefore take `&mut self`.

use core::ops::Range;
use std::sync::Arc;

use rune_config::TextAreaConfig;

use crate::buffer::{Edit, TextBuffer};
use crate::cache::MetricsCache;
use crate::caret::{CaretTracker, Motion, MoveKind, TrackerState};
use crate::error::Result;
use crate::font::Font;
use crate::geometry::{Rect, Size};
use crate::layout::{
    Bias, CursorMovement, HitTestResult, LayoutOptions, MovementDirection, Point, TextLayout,
};
use crate::metrics::MetricsProvider;
use crate::scroll::{ScrollOffset, ViewportScroller};
use crate::unicode::{prev_grapheme_boundary, next_grapheme_boundary, snap_to_grapheme};

#[derive(Debug)]
pub struct TextArea {
    buffer: TextBuffer,
    provider: Arc<dyn MetricsProvider>,
    font: Font,
    wrap_text: bool,
    line_spacing: f32,
    caret_width: f32,
    paragraph_end_past_newline: bool,
    scroller: ViewportScroller,
    viewport: Size,
    scroll: ScrollOffset,
    cache: MetricsCache,
    /// `None` while dirty.
    layout: Option<TextLayout>,
    /// Bumped whenever the layout is invalidated.
    layout_version: u64,
    tracker: CaretTracker,
    /// Inputs and result of the last caret scroll adjustment.
    last_scroll_target: Option<ScrollKey>,
}

/// Everything the caret scroll adjustment depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScrollKey {
    caret: Rect,
    viewport: Size,
    content: Size,
    scroll: ScrollOffset,
}

impl TextArea {
    /// Create a text area with settings from `config`.
    pub fn new(
        text: impl Into<String>,
        provider: Arc<dyn MetricsProvider>,
        config: &TextAreaConfig,
    ) -> Self {
        Self {
            buffer: TextBuffer::new(text),
            provider,
            font: Font::from(&config.font),
            wrap_text: config.layout.wrap_text,
            line_spacing: config.layout.line_spacing.max(0.0),
            caret_width: config.caret.width.max(0.0),
            paragraph_end_past_newline: config.caret.paragraph_end_past_newline,
            scroller: ViewportScroller::new(config.scroll.slop),
            viewport: Size::default(),
            scroll: ScrollOffset::default(),
            cache: MetricsCache::new(),
            layout: None,
            layout_version: 0,
            tracker: CaretTracker::new(),
            last_scroll_target: None,
        }
    }

    /// Create a text area with default settings.
    pub fn with_provider(text: impl Into<String>, provider: Arc<dyn MetricsProvider>) -> Self {
        Self::new(text, provider, &TextAreaConfig::default())
    }

    pub fn text(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn scroll(&self) -> ScrollOffset {
        self.scroll
    }

    pub fn wrap_text(&self) -> bool {
        self.wrap_text
    }

    pub fn tracker(&self) -> &CaretTracker {
        &self.tracker
    }

    pub fn state(&self) -> TrackerState {
        self.tracker.state()
    }

    pub fn caret_offset(&self) -> usize {
        self.tracker.offset()
    }

    pub fn selected_range(&self) -> Range<usize> {
        self.tracker.selected_range()
    }

    pub fn selected_text(&self) -> &str {
        let range = self.buffer.clamp_range(self.tracker.selected_range());
        &self.buffer.as_str()[range]
    }

    pub fn cache(&self) -> &MetricsCache {
        &self.cache
    }

    pub fn layout_version(&self) -> u64 {
        self.layout_version
    }

    fn invalidate_layout(&mut self) {
        self.layout = None;
        self.layout_version += 1;
    }

    fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            wrap_width: if self.wrap_text {
                self.viewport.width.max(0.0)
            } else {
                0.0
            },
            line_spacing: self.line_spacing,
            ..LayoutOptions::default()
        }
    }

    /// Current layout and the tracker, rebuilding the layout if dirty.
    fn layout_parts(&mut self) -> (&TextLayout, &mut CaretTracker) {
        let options = self.layout_options();
        let layout = self.layout.get_or_insert_with(|| {
            TextLayout::build(
                self.buffer.as_str(),
                self.font.clone(),
                self.provider.clone(),
                options,
                &mut self.cache,
            )
        });
        (layout, &mut self.tracker)
    }

    /// Current layout, rebuilt if dirty.
    pub fn layout(&mut self) -> &TextLayout {
        self.layout_parts().0
    }

    // --- host notifications ---

    /// Replace `range` with `new_text`, clamping an invalid range.
    ///
    /// The caret and selection follow the edit: offsets before it stay put,
    /// offsets after it shift, and offsets inside it land after the new
    /// text.
    pub fn on_text_changed(&mut self, range: Range<usize>, new_text: &str) -> Edit {
        let range = match self.buffer.check_range(range.clone()) {
            Ok(range) => range,
            Err(err) => {
                log::warn!("clamping edit: {err}");
                self.buffer.clamp_range(range)
            }
        };
        self.apply_edit(range, new_text)
    }

    /// Replace `range` with `new_text`, rejecting an invalid range.
    pub fn try_replace(&mut self, range: Range<usize>, new_text: &str) -> Result<Edit> {
        let range = self.buffer.check_range(range)?;
        Ok(self.apply_edit(range, new_text))
    }

    fn apply_edit(&mut self, range: Range<usize>, new_text: &str) -> Edit {
        let first = self.buffer.paragraph_index_at(range.start);
        let edit = self.buffer.replace(range, new_text);
        self.cache.text_changed(
            first,
            edit.removed_newlines + 1,
            edit.inserted_newlines + 1,
        );
        self.tracker.text_changed(&edit, self.buffer.as_str());
        self.invalidate_layout();
        edit
    }

    /// The font or its metrics changed in a way the area cannot see.
    pub fn on_font_or_wrap_width_changed(&mut self) {
        self.cache.font_changed();
        self.invalidate_layout();
    }

    pub fn on_viewport_resized(&mut self, width: f32, height: f32) {
        let viewport = Size::new(width.max(0.0), height.max(0.0));
        if viewport == self.viewport {
            return;
        }
        let rewrap = self.wrap_text && viewport.width != self.viewport.width;
        self.viewport = viewport;
        if rewrap {
            self.invalidate_layout();
        }
        let content = self.content_size();
        self.scroll = self.scroll.clamped(viewport, content);
    }

    pub fn set_font(&mut self, font: Font) {
        if font != self.font {
            self.font = font;
            self.on_font_or_wrap_width_changed();
        }
    }

    pub fn set_wrap_text(&mut self, wrap_text: bool) {
        if wrap_text != self.wrap_text {
            self.wrap_text = wrap_text;
            self.invalidate_layout();
        }
    }

    /// Set the scroll offset, clamped to the content.
    pub fn set_scroll(&mut self, scroll: ScrollOffset) {
        let viewport = self.viewport;
        let content = self.content_size();
        self.scroll = scroll.clamped(viewport, content);
    }

    // --- geometry ---

    /// Insertion point under `point` (content coordinates).
    pub fn hit_test(&mut self, point: Point) -> HitTestResult {
        self.layout().hit_test(point)
    }

    pub fn bounds_of(&mut self, offset: usize) -> Rect {
        self.layout().bounds_of(offset)
    }

    pub fn caret_shape(&mut self) -> Rect {
        let version = self.layout_version;
        let caret_width = self.caret_width;
        let (layout, tracker) = self.layout_parts();
        tracker.caret_shape(layout, version, caret_width)
    }

    pub fn selection_shapes(&mut self) -> &[Rect] {
        let version = self.layout_version;
        let caret_width = self.caret_width;
        let (layout, tracker) = self.layout_parts();
        tracker.selection_shapes(layout, version, caret_width)
    }

    /// Content extent, never smaller than the viewport.
    pub fn content_size(&mut self) -> Size {
        let viewport = self.viewport;
        self.layout().content_size(viewport)
    }

    // --- caret and selection ---

    fn lenient_offset(&self, offset: usize) -> usize {
        let offset = match self.buffer.check_offset(offset) {
            Ok(offset) => offset,
            Err(err) => {
                log::warn!("clamping caret: {err}");
                self.buffer.clamp_offset(offset)
            }
        };
        snap_to_grapheme(self.buffer.as_str(), offset)
    }

    fn strict_offset(&self, offset: usize) -> Result<usize> {
        let offset = self.buffer.check_offset(offset)?;
        Ok(snap_to_grapheme(self.buffer.as_str(), offset))
    }

    pub fn move_caret(&mut self, kind: MoveKind, extend: bool) -> Motion {
        let viewport_height = self.viewport.height;
        let past_newline = self.paragraph_end_past_newline;
        let (layout, tracker) = self.layout_parts();
        match kind {
            MoveKind::Left => tracker.move_horizontal(layout, MovementDirection::Left, extend),
            MoveKind::Right => tracker.move_horizontal(layout, MovementDirection::Right, extend),
            MoveKind::Up => tracker.move_vertical(layout, -1, extend),
            MoveKind::Down => tracker.move_vertical(layout, 1, extend),
            MoveKind::WordLeft => tracker.move_word(layout, MovementDirection::Left, extend),
            MoveKind::WordRight => tracker.move_word(layout, MovementDirection::Right, extend),
            MoveKind::LineStart => tracker.line_start(layout, extend),
            MoveKind::LineEnd => tracker.line_end(layout, extend),
            MoveKind::ParagraphStart => tracker.paragraph_start(layout, true, extend),
            MoveKind::ParagraphEnd => tracker.paragraph_end(layout, true, past_newline, extend),
            MoveKind::PageUp => tracker.move_page(layout, viewport_height, false, extend),
            MoveKind::PageDown => tracker.move_page(layout, viewport_height, true, extend),
            MoveKind::DocumentStart => tracker.document_start(extend),
            MoveKind::DocumentEnd => tracker.document_end(layout, extend),
        }
    }

    /// Place the caret (leading bias), clamping an out-of-range offset.
    pub fn position_caret(&mut self, offset: usize) {
        self.position_caret_with_bias(offset, Bias::Leading);
    }

    pub fn position_caret_with_bias(&mut self, offset: usize, bias: Bias) {
        let offset = self.lenient_offset(offset);
        self.tracker.position_caret(offset, bias);
    }

    pub fn try_position_caret(&mut self, offset: usize) -> Result<()> {
        let offset = self.strict_offset(offset)?;
        self.tracker.position_caret(offset, Bias::Leading);
        Ok(())
    }

    pub fn extend_selection(&mut self, offset: usize) {
        let offset = self.lenient_offset(offset);
        self.tracker.extend_selection(offset);
    }

    pub fn select_range(&mut self, anchor: usize, caret: usize) {
        let anchor = self.lenient_offset(anchor);
        let caret = self.lenient_offset(caret);
        self.tracker.select_range(anchor, caret);
    }

    pub fn try_select_range(&mut self, anchor: usize, caret: usize) -> Result<()> {
        let anchor = self.strict_offset(anchor)?;
        let caret = self.strict_offset(caret)?;
        self.tracker.select_range(anchor, caret);
        Ok(())
    }

    pub fn select_all(&mut self) {
        self.tracker.select_range(0, self.buffer.len());
    }

    // --- mouse ---

    /// Mouse press: place the caret, or extend the selection with `extend`
    /// (shift-click).
    pub fn press_at(&mut self, point: Point, extend: bool) -> HitTestResult {
        let hit = self.hit_test(point);
        if extend {
            self.tracker.extend_selection(hit.offset);
        } else {
            self.tracker.position_caret(hit.offset, hit.bias);
        }
        hit
    }

    /// Mouse drag: extend the selection to the point.
    pub fn drag_to(&mut self, point: Point) -> HitTestResult {
        let hit = self.hit_test(point);
        self.tracker.extend_selection(hit.offset);
        hit
    }

    /// Double click: select the word (or run of separators) under the point.
    pub fn select_word_at(&mut self, point: Point) {
        let (_, hit) = self.layout().hit_char(point);
        let range = CursorMovement::word_range_at(self.buffer.as_str(), hit.char_index);
        self.tracker.select_range(range.start, range.end);
    }

    /// Triple click: select the paragraph under the point.
    pub fn select_paragraph_at(&mut self, point: Point) {
        let hit = self.hit_test(point);
        let text = self.buffer.as_str();
        let start = CursorMovement::paragraph_start(text, hit.offset, false);
        let end =
            CursorMovement::paragraph_end(text, start, false, self.paragraph_end_past_newline);
        self.tracker.select_range(start, end);
    }

    // --- editing ---

    /// Replace the selection (or insert at the caret) and put the caret
    /// after the new text.
    pub fn replace_selection(&mut self, text: &str) -> Edit {
        let range = self.buffer.clamp_range(self.tracker.selected_range());
        let edit = self.apply_edit(range, text);
        self.tracker.position_caret(edit.inserted_end(), Bias::Leading);
        edit
    }

    pub fn insert_newline(&mut self) -> Edit {
        self.replace_selection("\n")
    }

    pub fn insert_tab(&mut self) -> Edit {
        self.replace_selection("\t")
    }

    /// Delete the selection, or the grapheme before (`previous`) or after
    /// the caret. Returns `false` when there was nothing to delete.
    pub fn delete_char(&mut self, previous: bool) -> bool {
        if !self.tracker.selection().is_collapsed() {
            self.replace_selection("");
            return true;
        }
        let offset = self.tracker.offset();
        let text = self.buffer.as_str();
        let range = if previous {
            prev_grapheme_boundary(text, offset).map(|start| start..offset)
        } else {
            next_grapheme_boundary(text, offset).map(|end| offset..end)
        };
        match range {
            Some(range) => {
                self.apply_edit(range.clone(), "");
                self.tracker.position_caret(range.start, Bias::Leading);
                true
            }
            None => false,
        }
    }

    /// Delete from the start of the caret's visual line up to the caret.
    pub fn delete_from_line_start(&mut self) -> bool {
        let end = self.tracker.offset();
        if end == 0 {
            return false;
        }
        let (layout, tracker) = self.layout_parts();
        tracker.line_start(layout, false);
        let start = self.tracker.offset();
        if end > start {
            self.apply_edit(start..end, "");
            self.tracker.position_caret(start, Bias::Leading);
            true
        } else {
            false
        }
    }

    // --- scrolling ---

    /// Scroll offset keeping the caret visible.
    ///
    /// Runs the scroller only when the caret bounds, the viewport, the
    /// content size or the scroll changed since the last adjustment, and
    /// adopts the result as the current scroll.
    pub fn required_scroll_adjustment(&mut self) -> ScrollOffset {
        let caret = self.caret_shape();
        let content = self.content_size();
        let viewport = self.viewport;
        let key = |scroll| ScrollKey {
            caret,
            viewport,
            content,
            scroll,
        };
        if self.last_scroll_target == Some(key(self.scroll)) {
            return self.scroll;
        }
        let scroll = self.scroll_rect_into_view(caret);
        self.last_scroll_target = Some(key(scroll));
        scroll
    }

    /// Scroll offset bringing the character at `offset` into view, adopted
    /// as the current scroll.
    pub fn scroll_offset_into_view(&mut self, offset: usize) -> ScrollOffset {
        let target = self.bounds_of(offset);
        self.scroll_rect_into_view(target)
    }

    fn scroll_rect_into_view(&mut self, target: Rect) -> ScrollOffset {
        let viewport = self.viewport;
        let content = self.content_size();
        self.scroll = self
            .scroller
            .ensure_visible(target, viewport, self.scroll, content);
        self.scroll
    }
}

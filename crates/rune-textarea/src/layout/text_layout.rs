use core::ops::Range;
use std::sync::Arc;

use crate::bidi::{BaseDirection, ParagraphBidi};
use crate::buffer::paragraph_ranges;
use crate::cache::MetricsCache;
use crate::font::{Font, ScaledFontMetrics};
use crate::geometry::{Rect, Size};
use crate::layout::{
    Bias, HitTestResult, ParagraphLayout, ParagraphMetrics, Point, Position, PrefixSums,
    VisualLine,
};
use crate::metrics::{CharHit, MetricsProvider};
use crate::unicode::{floor_char_boundary, next_grapheme_boundary, snap_to_grapheme};

/// Inputs to a layout pass besides the text and font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Wrap width in pixels; 0 disables wrapping.
    pub wrap_width: f32,
    /// Extra space below every line.
    pub line_spacing: f32,
    /// Base direction hint for paragraph analysis.
    pub base_direction: BaseDirection,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            wrap_width: 0.0,
            line_spacing: 0.0,
            base_direction: BaseDirection::Auto,
        }
    }
}

/// Laid-out buffer: paragraphs, wrapped visual lines and the indices that
/// map offsets and points onto them.
///
/// A layout is an immutable snapshot. Every query is total: offsets are
/// clamped into the text and points outside the content clamp to the
/// nearest line.
#[derive(Debug, Clone)]
pub struct TextLayout {
    /// Source text.
    text: String,
    font: Font,
    provider: Arc<dyn MetricsProvider>,
    font_metrics: ScaledFontMetrics,
    options: LayoutOptions,
    paragraphs: Vec<ParagraphLayout>,
    /// All visual lines in top-to-bottom order.
    lines: Vec<VisualLine>,
    /// Prefix sums over line tops and starts for fast lookups.
    prefix_sums: PrefixSums,
    /// Widest paragraph laid out on a single line.
    natural_width: f32,
}

impl TextLayout {
    /// Lay out `text` without a persistent cache.
    pub fn new(
        text: impl Into<String>,
        font: Font,
        provider: Arc<dyn MetricsProvider>,
        options: LayoutOptions,
    ) -> Self {
        Self::build(text, font, provider, options, &mut MetricsCache::new())
    }

    /// Lay out `text`, reusing paragraph measurements from `cache`.
    pub fn build(
        text: impl Into<String>,
        font: Font,
        provider: Arc<dyn MetricsProvider>,
        options: LayoutOptions,
        cache: &mut MetricsCache,
    ) -> Self {
        let text = text.into();
        let font_metrics = provider.font_metrics(&font);
        let ranges = paragraph_ranges(&text);

        cache.ensure_paragraphs(ranges.len());
        cache.set_wrap_width(options.wrap_width);

        let mut paragraphs = Vec::with_capacity(ranges.len());
        let mut lines = Vec::with_capacity(ranges.len());
        let mut natural_width = 0.0f32;
        let mut y = 0.0f32;

        for (index, range) in ranges.into_iter().enumerate() {
            let text_end = if text[range.clone()].ends_with('\n') {
                range.end - 1
            } else {
                range.end
            };
            let paragraph_text = &text[range.start..text_end];
            let measure = || {
                ParagraphMetrics::measure(
                    provider.as_ref(),
                    &font,
                    paragraph_text,
                    options.wrap_width,
                    index,
                )
            };
            let mut metrics = cache.get_or_measure(index, measure);
            if !metrics.covers(paragraph_text.len()) {
                log::warn!("stale metrics for paragraph {index}; re-measuring");
                metrics = cache.insert(index, measure());
            }

            let visual =
                metrics.visual_lines(&font_metrics, options.line_spacing, index, range.start, y);
            if let Some(last) = visual.last() {
                y = last.bottom_y();
            }
            natural_width = natural_width.max(metrics.natural_width);
            paragraphs.push(ParagraphLayout {
                range,
                text_end,
                first_line: lines.len(),
                line_count: visual.len(),
                natural_width: metrics.natural_width,
                bidi: ParagraphBidi::analyze(paragraph_text, options.base_direction),
            });
            lines.extend(visual);
        }

        let prefix_sums = PrefixSums::new(&lines);
        log::debug!(
            "laid out {} paragraph(s) into {} line(s), {}x{}",
            paragraphs.len(),
            lines.len(),
            natural_width,
            prefix_sums.total_height()
        );

        Self {
            text,
            font,
            provider,
            font_metrics,
            options,
            paragraphs,
            lines,
            prefix_sums,
            natural_width,
        }
    }

    /// Underlying source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// All visual lines in this layout.
    pub fn lines(&self) -> &[VisualLine] {
        &self.lines
    }

    pub fn paragraphs(&self) -> &[ParagraphLayout] {
        &self.paragraphs
    }

    /// Height of a line box, line spacing included.
    pub fn line_height(&self) -> f32 {
        self.font_metrics.line_height() + self.options.line_spacing.max(0.0)
    }

    /// Sum of all line heights.
    pub fn content_height(&self) -> f32 {
        self.prefix_sums.total_height()
    }

    /// Unwrapped width of the widest paragraph by total line height.
    pub fn preferred_size(&self) -> Size {
        Size::new(self.natural_width, self.content_height())
    }

    /// Preferred size grown to fill `viewport`, never shrunk below it.
    pub fn content_size(&self, viewport: Size) -> Size {
        self.preferred_size().max(viewport)
    }

    fn line_text(&self, line: &VisualLine) -> &str {
        &self.text[line.range()]
    }

    fn is_rtl_line(&self, line: &VisualLine) -> bool {
        self.paragraphs
            .get(line.paragraph_index)
            .is_some_and(|p| p.bidi.is_rtl())
    }

    /// Right-to-left lines are drawn mirrored: logical x runs from the
    /// right edge of the line. The mapping is its own inverse.
    fn mirror_x(&self, line: &VisualLine, x: f32) -> f32 {
        if self.is_rtl_line(line) { line.width - x } else { x }
    }

    /// Visual x of the caret at `offset` within `line`.
    fn caret_x_in_line(&self, line: &VisualLine, offset: usize) -> f32 {
        let local = offset.saturating_sub(line.start_offset);
        let logical = if local >= line.end_offset - line.start_offset {
            line.width
        } else {
            self.provider
                .caret_x(&self.font, self.line_text(line), local)
                .max(0.0)
        };
        self.mirror_x(line, logical)
    }

    /// Visual x of the logical start (or end) of line `line_index`.
    pub fn line_edge_x(&self, line_index: usize, start: bool) -> f32 {
        match self.lines.get(line_index) {
            Some(line) => self.mirror_x(line, if start { 0.0 } else { line.width }),
            None => 0.0,
        }
    }

    fn space_width(&self) -> f32 {
        self.provider.caret_x(&self.font, " ", 1).max(0.0)
    }

    /// Index of the line whose vertical span contains `y`, clamped to the
    /// first and last line.
    pub fn line_at_y(&self, y: f32) -> usize {
        self.prefix_sums.line_at_y(y).unwrap_or(0)
    }

    /// Index of the paragraph owning `offset`: the last one starting at or
    /// before it.
    pub fn paragraph_index_at(&self, offset: usize) -> usize {
        self.paragraphs
            .partition_point(|p| p.range.start <= offset)
            .saturating_sub(1)
    }

    /// Owning line of `offset`: the last line starting at or before it
    /// within the owning paragraph.
    fn line_containing(&self, offset: usize) -> usize {
        let Some(paragraph) = self.paragraphs.get(self.paragraph_index_at(offset)) else {
            return 0;
        };
        let lines = &self.lines[paragraph.lines()];
        let within = lines
            .partition_point(|l| l.start_offset <= offset)
            .saturating_sub(1);
        paragraph.first_line + within
    }

    /// Line showing the caret at `offset` with `bias`.
    ///
    /// A trailing caret at a soft-wrap boundary belongs to the end of the
    /// previous line.
    pub fn line_index_at(&self, offset: usize, bias: Bias) -> usize {
        let offset = floor_char_boundary(&self.text, offset);
        let index = self.line_containing(offset);
        if bias == Bias::Trailing && index > 0 {
            let line = &self.lines[index];
            let prev = &self.lines[index - 1];
            if offset == line.start_offset && prev.paragraph_index == line.paragraph_index {
                return index - 1;
            }
        }
        index
    }

    /// Whether the paragraph owning `offset` runs right-to-left.
    pub fn is_rtl_at(&self, offset: usize) -> bool {
        self.paragraphs
            .get(self.paragraph_index_at(offset))
            .is_some_and(|p| p.bidi.is_rtl())
    }

    /// Raw character under `point`: the line index and the hit character
    /// as a buffer offset.
    ///
    /// A point past the end of a line that ends in a hard newline hits the
    /// trailing half of the newline.
    pub fn hit_char(&self, point: Point) -> (usize, CharHit) {
        let index = self.line_at_y(point.y);
        let line = &self.lines[index];
        let paragraph = &self.paragraphs[line.paragraph_index];
        let x = self.mirror_x(line, point.x);

        if x >= line.width && line.end_offset == paragraph.text_end && paragraph.has_newline() {
            return (index, CharHit::new(line.end_offset, false));
        }

        let line_text = self.line_text(line);
        let hit = self.provider.hit_test_char(&self.font, line_text, x);
        let local = floor_char_boundary(line_text, hit.char_index);
        (index, CharHit::new(line.start_offset + local, hit.leading))
    }

    /// Turn a raw character hit on line `line_index` into an insertion
    /// point, snapping to grapheme clusters.
    ///
    /// A trailing hit whose insertion point follows a newline steps back in
    /// front of it with leading bias, so the caret stays on the line the
    /// user pointed at.
    pub fn resolve_hit(&self, line_index: usize, hit: CharHit) -> HitTestResult {
        let line_index = line_index.min(self.lines.len().saturating_sub(1));
        let line = &self.lines[line_index];
        let line_text = self.line_text(line);
        let local = hit.char_index.saturating_sub(line.start_offset);

        let (mut offset, mut bias) = if local >= line_text.len() {
            if hit.leading {
                (line.end_offset, Bias::Leading)
            } else {
                let next = self.text[line.end_offset..]
                    .chars()
                    .next()
                    .map_or(0, char::len_utf8);
                (line.end_offset + next, Bias::Trailing)
            }
        } else if hit.leading {
            (
                line.start_offset + snap_to_grapheme(line_text, local),
                Bias::Leading,
            )
        } else {
            let start = snap_to_grapheme(line_text, local);
            let end = next_grapheme_boundary(line_text, start).unwrap_or(line_text.len());
            (line.start_offset + end, Bias::Trailing)
        };

        if bias == Bias::Trailing && offset > 0 && self.text.as_bytes()[offset - 1] == b'\n' {
            offset -= 1;
            bias = Bias::Leading;
        }

        HitTestResult::new(offset, bias, line_index)
    }

    /// Insertion point under `point` (content coordinates).
    pub fn hit_test(&self, point: Point) -> HitTestResult {
        let (line_index, hit) = self.hit_char(point);
        self.resolve_hit(line_index, hit)
    }

    /// Bounds of the grapheme at `offset`.
    ///
    /// At the end of a line's text (a newline or the end of the buffer) the
    /// result is a zero-width terminator at the line's geometric end. The
    /// rectangle is always finite and at least zero-sized.
    pub fn bounds_of(&self, offset: usize) -> Rect {
        let offset = floor_char_boundary(&self.text, offset);
        let line = &self.lines[self.line_containing(offset)];
        let line_text = self.line_text(line);
        let local = offset.saturating_sub(line.start_offset);

        if local >= line_text.len() {
            return Rect::new(self.mirror_x(line, line.width), line.y_top, 0.0, line.height);
        }

        let start = snap_to_grapheme(line_text, local);
        let end = next_grapheme_boundary(line_text, start).unwrap_or(line_text.len());
        let x0 = self.caret_x_in_line(line, line.start_offset + start);
        let x1 = self.caret_x_in_line(line, line.start_offset + end);
        Rect::new(x0.min(x1), line.y_top, (x1 - x0).abs(), line.height)
    }

    /// Caret bar for `offset` with `bias`, `caret_width` wide and one line
    /// tall.
    pub fn caret_rect(&self, offset: usize, bias: Bias, caret_width: f32) -> Rect {
        let offset = floor_char_boundary(&self.text, offset);
        let line = &self.lines[self.line_index_at(offset, bias)];
        let x = self.caret_x_in_line(line, offset);
        Rect::new(x, line.y_top, caret_width.max(0.0), line.height)
    }

    /// Visual position of `offset`: caret x, line top and line index.
    pub fn offset_to_position(&self, offset: usize, bias: Bias) -> Position {
        let offset = floor_char_boundary(&self.text, offset);
        let index = self.line_index_at(offset, bias);
        let line = &self.lines[index];
        Position::new(self.caret_x_in_line(line, offset), line.y_top, index)
    }

    /// Highlight rectangles for `range`, one per intersected line.
    ///
    /// A line whose newline is selected is extended by the width of a space
    /// so empty paragraphs still show up as selected.
    pub fn selection_rects(&self, range: Range<usize>) -> Vec<Rect> {
        let start = floor_char_boundary(&self.text, range.start.min(range.end));
        let end = floor_char_boundary(&self.text, range.start.max(range.end));
        if start == end {
            return Vec::new();
        }

        let space = self.space_width();
        let mut rects = Vec::new();
        let first = self.paragraph_index_at(start);

        for paragraph in &self.paragraphs[first..] {
            if paragraph.range.start >= end {
                break;
            }
            let last_line = paragraph.first_line + paragraph.line_count - 1;
            for index in paragraph.lines() {
                let line = &self.lines[index];
                let newline = index == last_line && paragraph.has_newline();
                let full_end = if newline {
                    paragraph.range.end
                } else {
                    line.end_offset
                };
                if line.start_offset >= end || start >= full_end {
                    continue;
                }

                let seg_start = start.max(line.start_offset);
                let seg_end = end.min(line.end_offset).max(seg_start);
                let x0 = self.caret_x_in_line(line, seg_start);
                let x1 = self.caret_x_in_line(line, seg_end);
                let (mut left, mut right) = (x0.min(x1), x0.max(x1));
                if newline && end > line.end_offset {
                    // the newline sits past the logical end of the line
                    if self.is_rtl_line(line) {
                        left -= space;
                    } else {
                        right += space;
                    }
                }
                if right > left {
                    rects.push(Rect::new(left, line.y_top, right - left, line.height));
                }
            }
        }
        rects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MonospaceMetrics;

    /// 10px cells, 10px lines (ascent 8).
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

    #[test]
    fn empty_text_has_one_line() {
        let layout = layout("", 0.0);
        assert_eq!(layout.lines().len(), 1);
        assert_eq!(layout.content_height(), 10.0);
        let r = layout.bounds_of(0);
        assert_eq!(r, Rect::new(0.0, 0.0, 0.0, 10.0));
        let hit = layout.hit_test(Point::new(50.0, 50.0));
        assert_eq!((hit.offset, hit.bias), (0, Bias::Leading));
    }

    #[test]
    fn trailing_newline_gets_its_own_line() {
        let layout = layout("ab\n", 0.0);
        assert_eq!(layout.lines().len(), 2);
        assert_eq!(layout.lines()[1].range(), 3..3);
        assert_eq!(layout.bounds_of(3), Rect::new(0.0, 10.0, 0.0, 10.0));
        assert_eq!(layout.bounds_of(2), Rect::new(20.0, 0.0, 0.0, 10.0));
    }

    #[test]
    fn hit_past_line_end_stays_before_newline() {
        let layout = layout("ab\ncd", 0.0);
        let hit = layout.hit_test(Point::new(200.0, 5.0));
        assert_eq!((hit.offset, hit.bias), (2, Bias::Leading));
        assert_eq!(hit.line_index, 0);

        // trailing half of 'b' lands at 2 as well
        let hit = layout.hit_test(Point::new(17.0, 5.0));
        assert_eq!((hit.offset, hit.bias), (2, Bias::Trailing));
    }

    #[test]
    fn hit_clamps_vertically() {
        let layout = layout("ab\ncd", 0.0);
        let above = layout.hit_test(Point::new(12.0, -40.0));
        assert_eq!((above.offset, above.line_index), (1, 0));
        let below = layout.hit_test(Point::new(12.0, 400.0));
        assert_eq!((below.offset, below.line_index), (4, 1));
        let end = layout.hit_test(Point::new(400.0, 400.0));
        assert_eq!((end.offset, end.bias), (5, Bias::Trailing));
    }

    #[test]
    fn wrap_boundary_tie_break() {
        // "hello " | "world" at 50px
        let layout = layout("hello world", 50.0);
        assert_eq!(layout.lines().len(), 2);

        // trailing half of the hanging space
        let hit = layout.hit_test(Point::new(58.0, 5.0));
        assert_eq!((hit.offset, hit.bias, hit.line_index), (6, Bias::Trailing, 0));
        // past the end of the first line
        let hit = layout.hit_test(Point::new(90.0, 5.0));
        assert_eq!((hit.offset, hit.bias), (6, Bias::Trailing));
        // leading half of 'w'
        let hit = layout.hit_test(Point::new(2.0, 15.0));
        assert_eq!((hit.offset, hit.bias, hit.line_index), (6, Bias::Leading, 1));
    }

    #[test]
    fn caret_rect_follows_bias_at_wrap() {
        let layout = layout("hello world", 50.0);
        assert_eq!(
            layout.caret_rect(6, Bias::Trailing, 1.0),
            Rect::new(60.0, 0.0, 1.0, 10.0)
        );
        assert_eq!(
            layout.caret_rect(6, Bias::Leading, 1.0),
            Rect::new(0.0, 10.0, 1.0, 10.0)
        );
        assert_eq!(layout.line_index_at(6, Bias::Trailing), 0);
        assert_eq!(layout.line_index_at(6, Bias::Leading), 1);

        let pos = layout.offset_to_position(8, Bias::Leading);
        assert_eq!((pos.x, pos.y, pos.line_index), (20.0, 10.0, 1));
    }

    #[test]
    fn trailing_bias_does_not_cross_paragraphs() {
        let layout = layout("ab\ncd", 0.0);
        assert_eq!(layout.line_index_at(3, Bias::Trailing), 1);
    }

    #[test]
    fn hit_snaps_to_grapheme_clusters() {
        // 'e' + combining acute is one cell at bytes 1..4
        let layout = layout("xe\u{0301}y", 0.0);
        let hit = layout.hit_test(Point::new(17.0, 5.0));
        assert_eq!((hit.offset, hit.bias), (4, Bias::Trailing));
        let bounds = layout.bounds_of(2);
        assert_eq!(bounds, Rect::new(10.0, 0.0, 10.0, 10.0));
    }

    #[test]
    fn selection_rects_extend_over_newline() {
        let layout = layout("ab\n\ncd", 0.0);
        let rects = layout.selection_rects(1..5);
        assert_eq!(
            rects,
            vec![
                Rect::new(10.0, 0.0, 20.0, 10.0),
                Rect::new(0.0, 10.0, 10.0, 10.0),
                Rect::new(0.0, 20.0, 10.0, 10.0),
            ]
        );
        assert!(layout.selection_rects(3..3).is_empty());
    }

    #[test]
    fn selection_across_wrap() {
        let layout = layout("hello world", 50.0);
        let rects = layout.selection_rects(4..8);
        assert_eq!(
            rects,
            vec![
                Rect::new(40.0, 0.0, 20.0, 10.0),
                Rect::new(0.0, 10.0, 20.0, 10.0),
            ]
        );
    }

    #[test]
    fn content_size_grows_to_viewport() {
        let layout = layout("abc\nde", 0.0);
        assert_eq!(layout.preferred_size(), Size::new(30.0, 20.0));
        assert_eq!(
            layout.content_size(Size::new(100.0, 5.0)),
            Size::new(100.0, 20.0)
        );
    }

    #[test]
    fn cache_reuses_unchanged_paragraphs() {
        let provider: Arc<dyn MetricsProvider> = Arc::new(MonospaceMetrics::new());
        let font = Font::new("monospace", 10.0);
        let mut cache = MetricsCache::new();
        TextLayout::build("ab\ncd\nef", font.clone(), provider.clone(), LayoutOptions::default(), &mut cache);
        assert_eq!(cache.stats().misses, 3);

        // edit inside paragraph 1 only
        cache.text_changed(1, 1, 1);
        TextLayout::build("ab\ncXd\nef", font, provider, LayoutOptions::default(), &mut cache);
        assert_eq!(cache.stats().misses, 4);
        assert_eq!(cache.stats().hits, 2);
    }

    #[test]
    fn rtl_paragraph_detected() {
        let layout = layout("abc\n\u{05d0}\u{05d1}", 0.0);
        assert!(!layout.is_rtl_at(1));
        assert!(layout.is_rtl_at(5));
    }

    #[test]
    fn rtl_lines_are_mirrored() {
        // three 10px letters, logical offsets 0, 2, 4, 6
        let layout = layout("\u{05d0}\u{05d1}\u{05d2}", 0.0);
        assert_eq!(layout.caret_rect(0, Bias::Leading, 1.0).x, 30.0);
        assert_eq!(layout.caret_rect(2, Bias::Leading, 1.0).x, 20.0);
        assert_eq!(layout.bounds_of(0), Rect::new(20.0, 0.0, 10.0, 10.0));
        assert_eq!(layout.bounds_of(6), Rect::new(0.0, 0.0, 0.0, 10.0));
        assert_eq!(layout.line_edge_x(0, true), 30.0);

        let hit = layout.hit_test(Point::new(28.0, 5.0));
        assert_eq!((hit.offset, hit.bias), (0, Bias::Leading));
        let hit = layout.hit_test(Point::new(24.0, 5.0));
        assert_eq!((hit.offset, hit.bias), (2, Bias::Trailing));

        assert_eq!(layout.selection_rects(0..4), vec![Rect::new(10.0, 0.0, 20.0, 10.0)]);
    }
}

use std::sync::Arc;

use anyhow::Result;
use rune_textarea::unicode::is_grapheme_boundary;
use rune_textarea::{
    Bias, MonospaceMetrics, Point, Rect, ScrollOffset, Size, TextArea, TextAreaConfig,
    TrackerState, ViewportScroller,
};

const SAMPLES: &[&str] = &[
    "",
    "a",
    "ab\ncd",
    "a\n",
    "\n\n",
    "hello world\n\nfoo bar baz",
    "e\u{0301}x\u{4e16}\u{754c}",
];

fn area(text: &str, wrap_text: bool, viewport: Size) -> TextArea {
    let mut config = TextAreaConfig::default();
    config.font.size = 10.0;
    config.layout.wrap_text = wrap_text;
    let mut area = TextArea::new(
        text,
        Arc::new(MonospaceMetrics::new().with_cell_em(1.0)),
        &config,
    );
    area.on_viewport_resized(viewport.width, viewport.height);
    area
}

fn caret_offsets(text: &str) -> impl Iterator<Item = usize> + '_ {
    (0..=text.len()).filter(move |&o| is_grapheme_boundary(text, o))
}

#[test]
fn hit_test_round_trips_through_bounds() {
    for wrap_text in [false, true] {
        for text in SAMPLES {
            let mut area = area(text, wrap_text, Size::new(50.0, 40.0));
            let last_line_empty = area
                .layout()
                .lines()
                .last()
                .is_none_or(|line| line.is_empty());

            for offset in caret_offsets(text) {
                let bounds = area.bounds_of(offset);
                let hit = area.hit_test(Point::new(bounds.x, bounds.mid_y()));
                let bias = if offset == text.len() && !last_line_empty {
                    Bias::Trailing
                } else {
                    Bias::Leading
                };
                assert_eq!(
                    (hit.offset, hit.bias),
                    (offset, bias),
                    "text {text:?}, wrap {wrap_text}, offset {offset}"
                );
            }
        }
    }
}

#[test]
fn lines_tile_the_content_vertically() {
    for text in SAMPLES {
        let mut area = area(text, true, Size::new(50.0, 10.0));
        let layout = area.layout();
        let lines = layout.lines();
        assert!(!lines.is_empty());
        assert_eq!(lines[0].y_top, 0.0);
        for pair in lines.windows(2) {
            assert_eq!(pair[0].bottom_y(), pair[1].y_top, "text {text:?}");
            assert!(pair[0].start_offset <= pair[1].start_offset);
        }
        let total: f32 = lines.iter().map(|line| line.height).sum();
        assert_eq!(total, layout.content_height());
    }
}

#[test]
fn caret_is_always_placeable() {
    for text in SAMPLES {
        let mut area = area(text, true, Size::new(30.0, 30.0));
        for offset in 0..=text.len() + 2 {
            let rect = area.bounds_of(offset);
            assert!(rect.is_finite(), "text {text:?}, offset {offset}");
            assert!(rect.width >= 0.0 && rect.height >= 0.0);
        }
        area.position_caret(text.len());
        let caret = area.caret_shape();
        assert!(caret.is_finite());
        assert_eq!(caret.height, 10.0);
    }
}

#[test]
fn selection_is_symmetric() {
    let mut area = area("hello world\nsecond line", true, Size::new(60.0, 100.0));

    area.select_range(2, 15);
    let forward: Vec<Rect> = area.selection_shapes().to_vec();
    let forward_caret = area.caret_offset();

    area.select_range(15, 2);
    let backward: Vec<Rect> = area.selection_shapes().to_vec();

    assert_eq!(forward, backward);
    assert_ne!(forward_caret, area.caret_offset());
    assert_eq!(area.state(), TrackerState::Selecting { anchor: 15, caret: 2 });
}

#[test]
fn scrolling_is_idempotent() -> Result<()> {
    let scroller = ViewportScroller::default();
    let current = ScrollOffset::new(20.0, 0.0);
    let target = Rect::new(5.0, 30.0, 1.0, 10.0);
    let next = scroller.ensure_visible(target, Size::new(100.0, 50.0), current, Size::new(100.0, 400.0));
    assert_eq!(next, current);

    let text = (0..40).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
    let mut area = area(&text, false, Size::new(100.0, 50.0));
    area.try_position_caret(text.len())?;
    let first = area.required_scroll_adjustment();
    assert_eq!(first.top, area.content_size().height - 50.0);
    assert_eq!(area.required_scroll_adjustment(), first);
    Ok(())
}

#[test]
fn vertical_moves_keep_the_column() -> Result<()> {
    use rune_textarea::MoveKind;

    let mut area = area("short\nlong line\nshort", false, Size::new(200.0, 100.0));
    area.try_position_caret(3)?;
    area.move_caret(MoveKind::Down, false);
    assert_eq!(area.caret_offset(), 9);
    area.move_caret(MoveKind::Down, false);
    assert_eq!(area.caret_offset(), 19);
    Ok(())
}

#[test]
fn hit_past_newline_stays_on_its_line() {
    let mut area = area("ab\ncd", false, Size::new(200.0, 100.0));
    let hit = area.hit_test(Point::new(150.0, 5.0));
    assert_eq!((hit.offset, hit.bias), (2, Bias::Leading));
    assert_eq!(hit.line_index, 0);
}

#[test]
fn config_drives_the_area() -> Result<()> {
    let config = TextAreaConfig::from_toml_str(
        "[font]\nsize = 20.0\n\n[caret]\nwidth = 2.0\n\n[layout]\nwrap_text = false\n",
    )?;
    let mut area = TextArea::new(
        "abc def",
        Arc::new(MonospaceMetrics::new().with_cell_em(1.0)),
        &config,
    );
    area.on_viewport_resized(40.0, 100.0);
    assert_eq!(area.layout().lines().len(), 1);
    area.position_caret(1);
    assert_eq!(area.caret_shape(), Rect::new(20.0, 0.0, 2.0, 20.0));
    Ok(())
}

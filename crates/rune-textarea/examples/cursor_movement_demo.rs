use std::sync::Arc;

use anyhow::Result;
use rune_textarea::{MonospaceMetrics, MoveKind, TextArea, TextAreaConfig};

fn show(area: &mut TextArea, label: &str) {
    let caret = area.caret_shape();
    println!(
        "{:<24} offset={:<3} bias={:?} caret=({:.0}, {:.0})",
        label,
        area.caret_offset(),
        area.tracker().bias(),
        caret.x,
        caret.y
    );
}

fn main() -> Result<()> {
    env_logger::init();

    let mut config = TextAreaConfig::default();
    config.font.size = 10.0;
    let text = "short\nlong line here\nshort\n\nThe quick brown fox jumps over the lazy dog.";
    let mut area = TextArea::new(
        text,
        Arc::new(MonospaceMetrics::new().with_cell_em(1.0)),
        &config,
    );
    area.on_viewport_resized(120.0, 30.0);

    println!("=== Caret Movement Demo ===\n");
    for (index, line) in area.layout().lines().iter().enumerate() {
        println!("line {index}: {:?}", &text[line.range()]);
    }
    println!();

    area.try_position_caret(3)?;
    show(&mut area, "start");

    // The column survives the short lines in between.
    for _ in 0..3 {
        let motion = area.move_caret(MoveKind::Down, false);
        show(&mut area, &format!("down ({:?})", motion.moved()));
    }

    for kind in [
        MoveKind::LineEnd,
        MoveKind::Right,
        MoveKind::Right,
        MoveKind::WordRight,
        MoveKind::WordRight,
        MoveKind::LineStart,
        MoveKind::Left,
        MoveKind::ParagraphStart,
        MoveKind::PageDown,
        MoveKind::DocumentEnd,
        MoveKind::Right,
        MoveKind::DocumentStart,
    ] {
        let motion = area.move_caret(kind, false);
        show(&mut area, &format!("{kind:?}"));
        let scroll = area.required_scroll_adjustment();
        println!("{:<24} moved={} scroll top={:.0}", "", motion.moved(), scroll.top);
    }

    Ok(())
}

use std::sync::Arc;

use anyhow::Result;
use rune_textarea::{MonospaceMetrics, MoveKind, Point, TextArea, TextAreaConfig};

fn dump(area: &mut TextArea, label: &str) {
    println!("--- {label} ---");
    println!("text:      {:?}", area.text());
    println!("state:     {:?}", area.state());
    println!("selected:  {:?}", area.selected_text());
    for rect in area.selection_shapes() {
        println!(
            "highlight: x={:.0} y={:.0} w={:.0} h={:.0}",
            rect.x, rect.y, rect.width, rect.height
        );
    }
    println!();
}

fn main() -> Result<()> {
    env_logger::init();

    let mut config = TextAreaConfig::default();
    config.font.size = 10.0;
    let mut area = TextArea::new(
        "Hello world\nSecond paragraph",
        Arc::new(MonospaceMetrics::new().with_cell_em(1.0)),
        &config,
    );
    area.on_viewport_resized(100.0, 60.0);

    println!("=== Text Editing Demo ===\n");

    area.select_word_at(Point::new(75.0, 5.0));
    dump(&mut area, "double click on 'world'");

    area.replace_selection("there");
    dump(&mut area, "type over the selection");

    area.move_caret(MoveKind::Down, true);
    dump(&mut area, "shift+down");

    area.select_paragraph_at(Point::new(5.0, 15.0));
    dump(&mut area, "triple click on paragraph 2");

    let end = area.text().len();
    area.try_position_caret(end)?;
    area.insert_newline();
    area.replace_selection("Third");
    dump(&mut area, "append a paragraph");

    area.delete_from_line_start();
    dump(&mut area, "delete to line start");

    area.replace_selection("Thirty");
    area.delete_char(true);
    area.delete_char(true);
    dump(&mut area, "retype and backspace twice");

    // Edits from outside keep caret and cache in sync.
    area.on_text_changed(0..5, "Goodbye");
    dump(&mut area, "host edit");

    area.select_all();
    dump(&mut area, "select all");
    Ok(())
}

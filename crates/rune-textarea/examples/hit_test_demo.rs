use std::sync::Arc;

use rune_textarea::{Point, ShapedMetrics, TextArea, TextAreaConfig};

fn main() {
    env_logger::init();

    // Shapes with an installed face when the configured family resolves,
    // monospace cells otherwise.
    let config = TextAreaConfig::load();
    let text = "Hello, World!\nThis is line 2.\n\nAnd a much longer line 4 that wraps.";
    let mut area = TextArea::new(text, Arc::new(ShapedMetrics::new()), &config);
    area.on_viewport_resized(160.0, 120.0);

    println!("=== Hit Testing Demo (content coordinates) ===\n");
    println!("Text: {:?}", text);
    println!("Visual lines: {}", area.layout().lines().len());
    println!("Content size: {:?}\n", area.content_size());

    let line_height = area.layout().line_height();
    let test_points = vec![
        (0.0, 0.0, "Top-left corner (start of text)"),
        (50.0, 0.0, "Middle of first line"),
        (500.0, 0.0, "Past the end of the first line"),
        (0.0, line_height * 1.5, "Start of second line"),
        (20.0, line_height * 2.5, "Empty paragraph"),
        (1000.0, 1000.0, "Far beyond text (clamped)"),
        (-10.0, -10.0, "Before text (clamped)"),
    ];

    println!("--- Hit Testing Results ---");
    for (x, y, description) in test_points {
        let result = area.hit_test(Point::new(x, y));
        let char_at = text[result.offset..].chars().next().unwrap_or('∅');

        println!("\nPoint ({:.1}, {:.1}) - {}:", x, y, description);
        println!("  Byte offset: {}", result.offset);
        println!("  Line index: {}", result.line_index);
        println!("  Character: {:?}", char_at);
        println!("  Bias: {:?}", result.bias);
    }

    println!("\n--- Character Bounds ---");
    for (offset, description) in [
        (0, "Start of text"),
        (7, "After 'Hello, '"),
        (13, "Newline of line 1"),
        (text.len(), "End of text"),
    ] {
        let bounds = area.bounds_of(offset);
        println!("\nOffset {} - {}:", offset, description);
        println!(
            "  Bounds: x={:.2} y={:.2} w={:.2} h={:.2}",
            bounds.x, bounds.y, bounds.width, bounds.height
        );
    }
}

/// Example program to print the loaded configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    // Load configuration from textarea.toml plus RUNE_TEXTAREA_* overrides
    let config = rune_config::TextAreaConfig::load();

    println!("=== Text Area Configuration ===\n");

    println!("Font:");
    println!("  Family: {}", config.font.family);
    println!("  Size: {}", config.font.size);
    println!();

    println!("Layout:");
    println!("  Wrap Text: {}", config.layout.wrap_text);
    println!("  Line Spacing: {}", config.layout.line_spacing);
    println!();

    println!("Caret:");
    println!("  Width: {}", config.caret.width);
    println!(
        "  Paragraph End Past Newline: {}",
        config.caret.paragraph_end_past_newline
    );
    println!();

    println!("Scroll:");
    println!("  Slop: {}", config.scroll.slop);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}

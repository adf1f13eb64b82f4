//! Paragraph layout, hit-testing and caret geometry.

pub mod cursor;
pub mod cursor_movement;
pub mod line_box;
pub mod line_breaker;
pub mod paragraph;
pub mod prefix_sums;
pub mod selection;
pub mod text_layout;

pub use cursor::{Bias, CaretState};
pub use cursor_movement::{CursorMovement, MovementDirection};
pub use hit_test::{HitTestResult, Point, Position};
pub use line_box::VisualLine;
pub use line_breaker::{LineBreak, LineBreakKind, WordBoundary, WordBoundaryKind};
pub use paragraph::{ParagraphLayout, ParagraphMetrics, layout_paragraph};
pub use prefix_sums::PrefixSums;
pub use selection::Selection;
pub use text_layout::{LayoutOptions, TextLayout};

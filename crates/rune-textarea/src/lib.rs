//! rune-textarea: multi-line text area engine.
//!
//! - paragraph layout with soft wrapping, backed by a per-paragraph metrics cache
//! - hit-testing and character bounds in content coordinates
//! - caret and selection tracking with sticky vertical movement
//! - minimal scroll-into-view with edge snapping
//!
//! Measurement goes through a [`MetricsProvider`]: [`MonospaceMetrics`] is
//! deterministic and font-free, [`ShapedMetrics`] shapes real faces with
//! harfrust. Rendering and input handling are left to the host.

pub mod bidi;
pub mod buffer;
pub mod cache;
pub mod caret;
pub mod error;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod metrics;
pub mod scroll;
pub mod shaping;
pub mod text_area;
pub mod unicode;

pub use buffer::{Edit, TextBuffer};
pub use cache::{CacheStats, MetricsCache, ParagraphId};
pub use caret::{CaretTracker, Motion, MoveKind, TrackerState};
pub use error::{Result, TextAreaError};
pub use font::{Font, FontCache, FontError, FontFace, FontKey, FontMetrics, ScaledFontMetrics};
pub use geometry::{Rect, Size};
pub use layout::{
    Bias, CaretState, HitTestResult, LayoutOptions, Point, Position, Selection, TextLayout,
    VisualLine,
};
pub use metrics::{CharHit, MeasuredLine, MetricsProvider, MonospaceMetrics, ShapedMetrics, TextMeasure};
pub use scroll::{ScrollOffset, ViewportScroller};
pub use text_area::TextArea;

pub use rune_config::TextAreaConfig;

//! Text shaping via harfrust (pure-Rust HarfBuzz port).

pub mod shaped_run;
pub mod shaper;

pub use shaped_run::{ClusterMap, ClusterSpan, ShapedRun};
pub use shaper::TextShaper;

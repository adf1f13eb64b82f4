pub mod face;
pub mod loader;
pub mod metrics;

pub use face::FontFace;
pub use loader::{FontCache, FontKey};
pub use metrics::{FontMetrics, ScaledFontMetrics};

use thiserror::Error;

/// Errors that can occur while working with fonts.
#[derive(Error, Debug)]
pub enum FontError {
    #[error("font I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid font data")]
    InvalidFont,
    #[error("no installed font matches family {0:?}")]
    FamilyNotFound(String),
}

/// Convenient result alias for font-related operations.
pub type Result<T> = std::result::Result<T, FontError>;

/// Font selection handed to a metrics provider: a family name and a size.
///
/// Providers decide how the family maps onto a concrete face.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    /// Size in logical pixels (px per em).
    pub size: f32,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

impl From<&rune_config::FontConfig> for Font {
    fn from(config: &rune_config::FontConfig) -> Self {
        Self::new(config.family.clone(), config.size)
    }
}

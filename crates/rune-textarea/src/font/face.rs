use std::sync::Arc;

use swash::{FontRef, Metrics};

use crate::font::{FontError, FontMetrics, Result, ScaledFontMetrics};

/// Loaded font face backed by a font file (TTF/OTF).
///
/// This is a thin wrapper around `swash::FontRef` that owns the
/// underlying font data and exposes vertical metrics; shaping goes
/// through harfrust using [`FontFace::as_bytes`].
#[derive(Debug, Clone)]
pub struct FontFace {
    /// Full font data.
    data: Arc<[u8]>,
    /// Face index within a collection.
    index: u32,
    /// Extracted font metrics in font units.
    metrics: FontMetrics,
}

impl FontFace {
    /// Create a font face from raw bytes and a font index within the file.
    pub fn from_bytes(data: Arc<[u8]>, index: usize) -> Result<Self> {
        let font = FontRef::from_index(&data, index).ok_or(FontError::InvalidFont)?;
        let metrics = Self::metrics_from_swash(&font);
        Ok(Self {
            data,
            index: index as u32,
            metrics,
        })
    }

    /// Create a font face from raw bytes owned by a `Vec<u8>`.
    pub fn from_vec(data: Vec<u8>, index: usize) -> Result<Self> {
        Self::from_bytes(Arc::from(data), index)
    }

    /// Create a font face from a font file on disk.
    pub fn from_path(path: impl AsRef<std::path::Path>, index: usize) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_vec(data, index)
    }

    /// Expose the raw font bytes for the shaper.
    pub fn as_bytes(&self) -> Arc<[u8]> {
        self.data.clone()
    }

    /// Face index within the font file.
    pub fn index(&self) -> u32 {
        self.index
    }

    fn metrics_from_swash(font: &FontRef<'_>) -> FontMetrics {
        // Use default (no variation) coordinates.
        let Metrics {
            units_per_em,
            ascent,
            descent,
            leading,
            ..
        } = font.metrics(&[]);

        FontMetrics {
            ascent,
            descent,
            line_gap: leading,
            units_per_em,
        }
    }

    /// Font metrics in font units.
    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    /// Font metrics scaled to the requested pixel size (px per em).
    pub fn scaled_metrics(&self, font_size: f32) -> ScaledFontMetrics {
        self.metrics.scale_to_pixels(font_size)
    }
}

use harfrust::{
    Direction as HbDirection, FontRef as HbFontRef, ShaperData, ShaperInstance,
    UnicodeBuffer as HbUnicodeBuffer,
};

use crate::font::FontFace;

use super::ShapedRun;

/// Single-font, left-to-right shaper built on harfrust.
///
/// Kerning and ligatures follow HarfBuzz semantics; cluster values are byte
/// offsets into the shaped string.
pub struct TextShaper;

impl TextShaper {
    /// Shape a UTF-8 string with the given font and size.
    ///
    /// Returns `None` when harfrust cannot parse the face data.
    pub fn shape_ltr(text: &str, font: &FontFace, font_size: f32) -> Option<ShapedRun> {
        if text.is_empty() {
            return Some(ShapedRun {
                font_size,
                ..ShapedRun::default()
            });
        }

        let font_data = font.as_bytes();
        let font_ref = match HbFontRef::from_index(&font_data, font.index()) {
            Ok(font_ref) => font_ref,
            Err(err) => {
                log::warn!("harfrust rejected font data: {err:?}");
                return None;
            }
        };

        // Shaper configuration with default (no variations) instance.
        let data = ShaperData::new(&font_ref);
        let instance = ShaperInstance::from_variations(
            &font_ref,
            core::iter::empty::<harfrust::Variation>(),
        );
        let shaper = data
            .shaper(&font_ref)
            .instance(Some(&instance))
            .point_size(None)
            .build();

        let mut buffer = HbUnicodeBuffer::new();
        buffer.push_str(text);
        buffer.set_direction(HbDirection::LeftToRight);
        buffer.guess_segment_properties();

        let glyph_buffer = shaper.shape(buffer, &[]);
        let infos = glyph_buffer.glyph_infos();
        let positions = glyph_buffer.glyph_positions();

        // harfrust uses design units; convert to pixels.
        let metrics = font.metrics();
        let scale = if metrics.units_per_em != 0 {
            font_size / metrics.units_per_em as f32
        } else {
            1.0
        };

        let mut run = ShapedRun {
            font_size,
            glyphs: Vec::with_capacity(infos.len()),
            advances: Vec::with_capacity(infos.len()),
            clusters: Vec::with_capacity(infos.len()),
            width: 0.0,
        };
        for (info, pos) in infos.iter().zip(positions.iter()) {
            let x_advance = pos.x_advance as f32 * scale;
            run.glyphs.push(info.glyph_id);
            run.advances.push(x_advance);
            run.clusters.push(info.cluster);
            run.width += x_advance;
        }
        Some(run)
    }
}

use core::ops::Range;

/// A run of text shaped with a single font, in logical (LTR) order.
#[derive(Debug, Clone, Default)]
pub struct ShapedRun {
    /// Font size in pixels.
    pub font_size: f32,
    /// Glyph IDs in logical order for this run.
    pub glyphs: Vec<u32>,
    /// Glyph advances in pixels.
    pub advances: Vec<f32>,
    /// Cluster indices mapping glyphs to byte offsets in the shaped text.
    /// Multiple glyphs can map to the same cluster (ligatures, marks).
    pub clusters: Vec<u32>,
    /// Total advance width of the run in pixels.
    pub width: f32,
}

/// Horizontal extent of one shaping cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSpan {
    /// Byte range covered by the cluster.
    pub range: Range<usize>,
    /// Pen position at the cluster's leading edge.
    pub x: f32,
    /// Summed advance of the cluster's glyphs.
    pub advance: f32,
}

/// Byte offset to pen position map for a shaped run.
#[derive(Debug, Clone, Default)]
pub struct ClusterMap {
    spans: Vec<ClusterSpan>,
    width: f32,
}

impl ShapedRun {
    /// Group glyphs into clusters, each spanning up to the next cluster start.
    ///
    /// `text_len` closes the final cluster.
    pub fn cluster_map(&self, text_len: usize) -> ClusterMap {
        let mut spans: Vec<ClusterSpan> = Vec::new();
        let mut pen = 0.0f32;
        for (cluster, advance) in self.clusters.iter().zip(&self.advances) {
            let start = *cluster as usize;
            match spans.last_mut() {
                Some(last) if last.range.start == start => last.advance += advance,
                _ => spans.push(ClusterSpan {
                    range: start..start,
                    x: pen,
                    advance: *advance,
                }),
            }
            pen += advance;
        }
        let starts: Vec<usize> = spans.iter().map(|s| s.range.start).collect();
        for (i, span) in spans.iter_mut().enumerate() {
            span.range.end = starts.get(i + 1).copied().unwrap_or(text_len);
        }
        ClusterMap {
            spans,
            width: self.width,
        }
    }
}

impl ClusterMap {
    pub fn spans(&self) -> &[ClusterSpan] {
        &self.spans
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Pen position at byte `index`, interpolating inside a cluster.
    pub fn x_at(&self, index: usize) -> f32 {
        for span in &self.spans {
            if index <= span.range.start {
                return span.x;
            }
            if index < span.range.end {
                let frac = (index - span.range.start) as f32 / span.range.len() as f32;
                return span.x + span.advance * frac;
            }
        }
        self.width
    }

    /// Width of a byte range.
    pub fn width_of(&self, range: Range<usize>) -> f32 {
        (self.x_at(range.end) - self.x_at(range.start)).max(0.0)
    }

    /// Cluster under pen position `x`: its start offset and whether `x` is
    /// on its leading half.
    pub fn hit(&self, x: f32) -> (usize, bool) {
        for span in &self.spans {
            if x < span.x + span.advance {
                return (span.range.start, x - span.x < span.advance / 2.0);
            }
        }
        match self.spans.last() {
            Some(span) => (span.range.start, false),
            None => (0, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> ShapedRun {
        // "ffi" ligature (one glyph for bytes 0..3) followed by "x"
        ShapedRun {
            font_size: 10.0,
            glyphs: vec![7, 8],
            advances: vec![12.0, 6.0],
            clusters: vec![0, 3],
            width: 18.0,
        }
    }

    #[test]
    fn clusters_span_to_next_start() {
        let map = run().cluster_map(4);
        let spans = map.spans();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].range, 0..3);
        assert_eq!(spans[0].advance, 12.0);
        assert_eq!(spans[1].range, 3..4);
        assert_eq!(spans[1].x, 12.0);
    }

    #[test]
    fn x_interpolates_inside_ligature() {
        let map = run().cluster_map(4);
        assert_eq!(map.x_at(0), 0.0);
        assert_eq!(map.x_at(3), 12.0);
        assert_eq!(map.x_at(4), 18.0);
        assert!((map.x_at(1) - 4.0).abs() < 1e-4);
        assert_eq!(map.width_of(3..4), 6.0);
    }

    #[test]
    fn marks_merge_into_base_cluster() {
        // base + mark glyphs share cluster 0
        let run = ShapedRun {
            font_size: 10.0,
            glyphs: vec![1, 2, 3],
            advances: vec![8.0, 0.0, 8.0],
            clusters: vec![0, 0, 3],
            width: 16.0,
        };
        let map = run.cluster_map(4);
        assert_eq!(map.spans().len(), 2);
        assert_eq!(map.hit(5.0), (0, false));
        assert_eq!(map.hit(9.0), (3, true));
        assert_eq!(map.hit(40.0), (3, false));
    }

    #[test]
    fn empty_run_hits_origin() {
        let map = ShapedRun::default().cluster_map(0);
        assert_eq!(map.hit(3.0), (0, true));
        assert_eq!(map.x_at(0), 0.0);
    }
}

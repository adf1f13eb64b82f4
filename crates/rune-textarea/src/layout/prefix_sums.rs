use crate::layout::VisualLine;

/// Prefix sums over line tops for O(log n) lookups by y.
#[derive(Debug, Clone, Default)]
pub struct PrefixSums {
    /// Cumulative line heights (line top positions), one per line.
    tops: Vec<f32>,
    /// Sum of all line heights.
    total_height: f32,
}

impl PrefixSums {
    /// Build prefix sums from laid-out lines.
    pub fn new(lines: &[VisualLine]) -> Self {
        let mut tops = Vec::with_capacity(lines.len());
        let mut y = 0.0f32;

        for line in lines {
            tops.push(y);
            y += line.height;
        }

        Self {
            tops,
            total_height: y,
        }
    }

    /// Line whose vertical span contains `y`, clamped to the first and last
    /// line for points above or below the content.
    pub fn line_at_y(&self, y: f32) -> Option<usize> {
        if self.tops.is_empty() {
            return None;
        }
        let idx = self.tops.partition_point(|top| *top <= y);
        Some(idx.saturating_sub(1))
    }

    pub fn total_height(&self) -> f32 {
        self.total_height
    }
}

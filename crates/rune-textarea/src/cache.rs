//! Per-paragraph measurement cache.
//!
//! Paragraphs get a [`ParagraphId`] that survives edits elsewhere in the
//! buffer, so an edit only re-measures the paragraphs it touched. Entries
//! are keyed by `(paragraph id, wrap width)`; a font change or a new wrap
//! width drops everything.

use std::sync::Arc;

use hashbrown::{HashMap, HashSet};

use crate::layout::ParagraphMetrics;

/// Stable identity of a paragraph across edits of other paragraphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParagraphId(u64);

/// Hit/miss counters, mostly for tests and diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Default)]
pub struct MetricsCache {
    /// Paragraph identities in document order.
    ids: Vec<ParagraphId>,
    next_id: u64,
    /// Bit pattern of the wrap width the entries were measured at.
    wrap_key: u32,
    entries: HashMap<(ParagraphId, u32), Arc<ParagraphMetrics>>,
    stats: CacheStats,
}

impl MetricsCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> ParagraphId {
        let id = ParagraphId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Identity of the paragraph at `index`, if it is tracked.
    pub fn paragraph_id(&self, index: usize) -> Option<ParagraphId> {
        self.ids.get(index).copied()
    }

    /// Number of tracked paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.ids.len()
    }

    /// Number of cached measurements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Forget everything and track `paragraph_count` fresh paragraphs.
    pub fn reset(&mut self, paragraph_count: usize) {
        self.entries.clear();
        self.ids.clear();
        for _ in 0..paragraph_count {
            let id = self.fresh_id();
            self.ids.push(id);
        }
    }

    /// Make sure the cache tracks exactly `paragraph_count` paragraphs.
    ///
    /// A mismatch means edits bypassed [`MetricsCache::text_changed`], so
    /// identities can no longer be trusted.
    pub fn ensure_paragraphs(&mut self, paragraph_count: usize) {
        if self.ids.len() != paragraph_count {
            if !self.ids.is_empty() {
                log::debug!(
                    "paragraph count changed from {} to {} without notice; resetting cache",
                    self.ids.len(),
                    paragraph_count
                );
            }
            self.reset(paragraph_count);
        }
    }

    /// Paragraphs `first..first + removed` were replaced by `inserted` new
    /// ones. Their measurements are dropped; every other paragraph keeps
    /// its identity.
    pub fn text_changed(&mut self, first: usize, removed: usize, inserted: usize) {
        if self.ids.is_empty() {
            return;
        }
        let first = first.min(self.ids.len());
        let removed = removed.min(self.ids.len() - first);
        let fresh: Vec<ParagraphId> = (0..inserted).map(|_| self.fresh_id()).collect();
        let gone: HashSet<ParagraphId> = self.ids.splice(first..first + removed, fresh).collect();
        self.entries.retain(|(id, _), _| !gone.contains(id));
        log::trace!(
            "invalidated {} paragraph(s) at {first}, {} new",
            gone.len(),
            inserted
        );
    }

    /// Font changed: every measurement is stale.
    pub fn font_changed(&mut self) {
        log::debug!("font changed; dropping {} cached paragraph(s)", self.entries.len());
        self.entries.clear();
    }

    /// Switch to a new wrap width, dropping measurements taken at another one.
    pub fn set_wrap_width(&mut self, wrap_width: f32) {
        let key = wrap_width.max(0.0).to_bits();
        if key != self.wrap_key {
            log::debug!(
                "wrap width changed to {}; dropping {} cached paragraph(s)",
                wrap_width.max(0.0),
                self.entries.len()
            );
            self.entries.clear();
            self.wrap_key = key;
        }
    }

    /// Cached metrics for paragraph `index`, if measured at the current wrap
    /// width.
    pub fn get(&self, index: usize) -> Option<Arc<ParagraphMetrics>> {
        let id = self.paragraph_id(index)?;
        self.entries.get(&(id, self.wrap_key)).cloned()
    }

    /// Store metrics for paragraph `index` at the current wrap width.
    pub fn insert(&mut self, index: usize, metrics: ParagraphMetrics) -> Arc<ParagraphMetrics> {
        let metrics = Arc::new(metrics);
        if let Some(id) = self.paragraph_id(index) {
            self.entries.insert((id, self.wrap_key), metrics.clone());
        }
        metrics
    }

    /// Cached metrics for paragraph `index`, measuring on a miss.
    pub fn get_or_measure(
        &mut self,
        index: usize,
        measure: impl FnOnce() -> ParagraphMetrics,
    ) -> Arc<ParagraphMetrics> {
        if let Some(metrics) = self.get(index) {
            self.stats.hits += 1;
            log::trace!("metrics cache hit for paragraph {index}");
            return metrics;
        }
        self.stats.misses += 1;
        log::trace!("metrics cache miss for paragraph {index}");
        self.insert(index, measure())
    }
}

use std::sync::{Arc, Mutex};

use hashbrown::{HashMap, HashSet};

use crate::font::{Font, FontCache, FontFace, FontKey, ScaledFontMetrics};
use crate::layout::line_breaker::wrap_greedy;
use crate::shaping::{ClusterMap, TextShaper};
use crate::unicode::floor_char_boundary;

use super::{CharHit, MetricsProvider, MonospaceMetrics, TextMeasure};

#[derive(Debug, Default)]
struct FaceRegistry {
    cache: FontCache,
    missing: HashSet<String>,
}

/// (family, size bits, line text)
type ClusterKey = (String, u32, String);

/// Shaped cluster maps of recently measured lines.
///
/// Hit-testing and caret placement query the same line many times between
/// edits, so each (font, text) pair is shaped once. The map is dropped
/// wholesale when it reaches capacity.
#[derive(Debug)]
struct ClusterCache {
    maps: HashMap<ClusterKey, Arc<ClusterMap>>,
    capacity: usize,
}

impl ClusterCache {
    const DEFAULT_CAPACITY: usize = 512;

    fn with_capacity(capacity: usize) -> Self {
        Self {
            maps: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    fn get_or_shape(
        &mut self,
        font: &Font,
        text: &str,
        shape: impl FnOnce() -> Option<ClusterMap>,
    ) -> Option<Arc<ClusterMap>> {
        let key = (font.family.clone(), font.size.to_bits(), text.to_owned());
        if let Some(map) = self.maps.get(&key) {
            return Some(map.clone());
        }
        let map = Arc::new(shape()?);
        if self.maps.len() >= self.capacity {
            log::trace!("cluster cache full, dropping {} maps", self.maps.len());
            self.maps.clear();
        }
        self.maps.insert(key, map.clone());
        Some(map)
    }

    fn clear(&mut self) {
        self.maps.clear();
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.maps.len()
    }
}

/// Font-backed metrics: faces resolved through fontdb, shaped with harfrust.
///
/// Families that cannot be resolved fall back to [`MonospaceMetrics`] so
/// measurement stays total on hosts without the requested fonts.
#[derive(Debug)]
pub struct ShapedMetrics {
    faces: Mutex<FaceRegistry>,
    clusters: Mutex<ClusterCache>,
    fixed: Option<Arc<FontFace>>,
    fallback: MonospaceMetrics,
}

impl Default for ShapedMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ShapedMetrics {
    /// Resolve families against the installed system fonts.
    pub fn new() -> Self {
        Self {
            faces: Mutex::new(FaceRegistry::default()),
            clusters: Mutex::new(ClusterCache::with_capacity(ClusterCache::DEFAULT_CAPACITY)),
            fixed: None,
            fallback: MonospaceMetrics::default(),
        }
    }

    /// Use one face for every family.
    pub fn with_face(face: FontFace) -> Self {
        Self {
            fixed: Some(Arc::new(face)),
            ..Self::new()
        }
    }

    /// Register a face under a family name ahead of any system lookup.
    pub fn register_family(&self, family: impl Into<String>, face: FontFace) {
        if let Ok(mut faces) = self.faces.lock() {
            let family = family.into();
            faces.missing.remove(&family);
            faces.cache.insert(FontKey::family(family), Arc::new(face));
        }
        if let Ok(mut clusters) = self.clusters.lock() {
            clusters.clear();
        }
    }

    fn face_for(&self, font: &Font) -> Option<Arc<FontFace>> {
        if let Some(face) = &self.fixed {
            return Some(face.clone());
        }
        let mut faces = self.faces.lock().ok()?;
        if faces.missing.contains(&font.family) {
            return None;
        }
        match faces.cache.get_or_load_family(&font.family) {
            Ok(face) => Some(face),
            Err(err) => {
                log::warn!("falling back to monospace metrics: {err}");
                faces.missing.insert(font.family.clone());
                None
            }
        }
    }

    fn cluster_map(&self, face: &FontFace, font: &Font, text: &str) -> Option<Arc<ClusterMap>> {
        let shape = || {
            TextShaper::shape_ltr(text, face, font.size).map(|run| run.cluster_map(text.len()))
        };
        match self.clusters.lock() {
            Ok(mut clusters) => clusters.get_or_shape(font, text, shape),
            Err(_) => shape().map(Arc::new),
        }
    }
}

impl MetricsProvider for ShapedMetrics {
    fn font_metrics(&self, font: &Font) -> ScaledFontMetrics {
        match self.face_for(font) {
            Some(face) => face.scaled_metrics(font.size),
            None => self.fallback.font_metrics(font),
        }
    }

    fn measure(&self, font: &Font, text: &str, wrap_width: f32) -> TextMeasure {
        let Some(face) = self.face_for(font) else {
            return self.fallback.measure(font, text, wrap_width);
        };
        let Some(map) = self.cluster_map(&face, font, text) else {
            return self.fallback.measure(font, text, wrap_width);
        };
        // Shape once; wrap candidates are measured as differences of pen
        // positions, so kerning across a break is ignored.
        let lines = wrap_greedy(text, wrap_width, |range| map.width_of(range));
        TextMeasure::from_lines(lines, face.scaled_metrics(font.size).line_height())
    }

    fn hit_test_char(&self, font: &Font, text: &str, x: f32) -> CharHit {
        let map = self
            .face_for(font)
            .and_then(|face| self.cluster_map(&face, font, text));
        match map {
            Some(map) => {
                let (char_index, leading) = map.hit(x);
                CharHit::new(char_index, leading)
            }
            None => self.fallback.hit_test_char(font, text, x),
        }
    }

    fn caret_x(&self, font: &Font, text: &str, index: usize) -> f32 {
        let index = floor_char_boundary(text, index);
        let map = self
            .face_for(font)
            .and_then(|face| self.cluster_map(&face, font, text));
        match map {
            Some(map) => map.x_at(index),
            None => self.fallback.caret_x(font, text, index),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn unknown_family_falls_back_to_monospace() {
        let shaped = ShapedMetrics::new();
        let font = Font::new("No Such Family 3f9a", 10.0);
        let mono = MonospaceMetrics::default();

        // Whether or not the host has system fonts, a made-up family name
        // never resolves.
        assert_eq!(shaped.font_metrics(&font), mono.font_metrics(&font));
        assert_eq!(
            shaped.measure(&font, "hello", 0.0),
            mono.measure(&font, "hello", 0.0)
        );
        assert_eq!(
            shaped.hit_test_char(&font, "hello", 7.0),
            mono.hit_test_char(&font, "hello", 7.0)
        );
    }

    #[test]
    fn cluster_maps_are_shaped_once_per_line() {
        let mut cache = ClusterCache::with_capacity(2);
        let font = Font::new("Sans", 12.0);
        let shaped = Cell::new(0);
        let shape = || {
            shaped.set(shaped.get() + 1);
            Some(ClusterMap::default())
        };

        let first = cache.get_or_shape(&font, "hello", shape);
        let again = cache.get_or_shape(&font, "hello", shape);
        assert!(Arc::ptr_eq(&first.unwrap(), &again.unwrap()));
        assert_eq!(shaped.get(), 1);

        // size and text are part of the key
        cache.get_or_shape(&Font::new("Sans", 14.0), "hello", shape);
        assert_eq!(shaped.get(), 2);
        assert_eq!(cache.len(), 2);

        // full: the next line starts a fresh map
        cache.get_or_shape(&font, "world", shape);
        assert_eq!(shaped.get(), 3);
        assert_eq!(cache.len(), 1);
        cache.get_or_shape(&font, "hello", shape);
        assert_eq!(shaped.get(), 4);
    }

    #[test]
    fn failed_shaping_is_not_cached() {
        let mut cache = ClusterCache::with_capacity(4);
        let font = Font::new("Sans", 12.0);
        assert!(cache.get_or_shape(&font, "x", || None).is_none());
        assert_eq!(cache.len(), 0);
        assert!(cache.get_or_shape(&font, "x", || Some(ClusterMap::default())).is_some());
        assert_eq!(cache.len(), 1);
    }
}

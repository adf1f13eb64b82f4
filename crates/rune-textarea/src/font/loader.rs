use std::path::{Path, PathBuf};
use std::sync::Arc;

use hashbrown::HashMap;

use crate::font::{FontError, FontFace, Result};

/// Key for identifying a font within the cache.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum FontKey {
    /// Font file on disk plus face index (for collections).
    Path { path: PathBuf, index: u32 },
    /// Installed system family resolved through fontdb.
    Family(String),
}

impl FontKey {
    pub fn path(path: impl AsRef<Path>, index: usize) -> Self {
        FontKey::Path {
            path: path.as_ref().to_path_buf(),
            index: index as u32,
        }
    }

    pub fn family(name: impl Into<String>) -> Self {
        FontKey::Family(name.into())
    }
}

/// In-memory font cache keyed by file path or family name.
#[derive(Default)]
pub struct FontCache {
    fonts: HashMap<FontKey, Arc<FontFace>>,
    system: Option<fontdb::Database>,
}

impl std::fmt::Debug for FontCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontCache")
            .field("fonts", &self.fonts.keys().collect::<Vec<_>>())
            .field("system_loaded", &self.system.is_some())
            .finish()
    }
}

impl FontCache {
    pub fn new() -> Self {
        Self {
            fonts: HashMap::new(),
            system: None,
        }
    }

    /// Get a font face from the cache or load it from disk.
    pub fn get_or_load(&mut self, path: impl AsRef<Path>, index: usize) -> Result<Arc<FontFace>> {
        let key = FontKey::path(&path, index);
        if let Some(face) = self.fonts.get(&key) {
            return Ok(face.clone());
        }

        let face = Arc::new(FontFace::from_path(path, index)?);
        self.fonts.insert(key, face.clone());
        Ok(face)
    }

    /// Get an installed font family, scanning system fonts on first use.
    ///
    /// Generic names (`monospace`, `serif`, `sans-serif`) map onto the
    /// fontdb generic families.
    pub fn get_or_load_family(&mut self, family: &str) -> Result<Arc<FontFace>> {
        let key = FontKey::family(family);
        if let Some(face) = self.fonts.get(&key) {
            return Ok(face.clone());
        }

        let db = self.system.get_or_insert_with(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("loaded {} system font faces", db.len());
            db
        });

        let families = [match family {
            "monospace" => fontdb::Family::Monospace,
            "serif" => fontdb::Family::Serif,
            "sans-serif" => fontdb::Family::SansSerif,
            name => fontdb::Family::Name(name),
        }];
        let query = fontdb::Query {
            families: &families,
            ..fontdb::Query::default()
        };
        let id = db
            .query(&query)
            .ok_or_else(|| FontError::FamilyNotFound(family.to_string()))?;
        let (data, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or(FontError::InvalidFont)?;

        let face = Arc::new(FontFace::from_vec(data, index as usize)?);
        self.fonts.insert(key, face.clone());
        Ok(face)
    }

    /// Insert an already constructed font face with an explicit key.
    pub fn insert(&mut self, key: FontKey, face: Arc<FontFace>) {
        self.fonts.insert(key, face);
    }

    /// Retrieve a font by key if it exists.
    pub fn get(&self, key: &FontKey) -> Option<Arc<FontFace>> {
        self.fonts.get(key).cloned()
    }
}

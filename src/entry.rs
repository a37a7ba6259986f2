use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{ImageReader, RgbaImage};

use crate::error::{AtlasError, Result};

/// Read capability for images compiled into or bundled with the binary,
/// addressed by path. The atlas re-reads embedded sources on every pack, so
/// implementations should be cheap to call repeatedly.
pub trait ResourceSet {
    fn read(&self, path: &str) -> std::io::Result<Vec<u8>>;
}

/// Where a pending texture's pixels come from.
///
/// Inline pixels are owned and dropped once packed; file and embedded
/// sources are re-read on demand, including on repack.
#[derive(Clone)]
pub enum Source {
    Pixels(RgbaImage),
    File(PathBuf),
    Embedded {
        resources: Arc<dyn ResourceSet>,
        path: String,
    },
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Pixels(img) => f
                .debug_tuple("Pixels")
                .field(&(img.width(), img.height()))
                .finish(),
            Source::File(path) => f.debug_tuple("File").field(path).finish(),
            Source::Embedded { path, .. } => f.debug_tuple("Embedded").field(path).finish(),
        }
    }
}

/// A registered, not-yet-packed texture.
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    /// Grid cell size for slice entries. Must evenly divide `width`/`height`.
    pub cell: Option<(u32, u32)>,
    pub source: Source,
}

impl Entry {
    /// Materializes the entry's pixels.
    pub fn load(&self) -> Result<RgbaImage> {
        match &self.source {
            Source::Pixels(img) => Ok(img.clone()),
            Source::File(path) => load_file(path),
            Source::Embedded { resources, path } => load_embedded(resources.as_ref(), path),
        }
    }
}

pub(crate) fn load_file(path: &Path) -> Result<RgbaImage> {
    let reader = ImageReader::open(path).map_err(|source| AtlasError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(reader.decode()?.to_rgba8())
}

pub(crate) fn load_embedded(resources: &dyn ResourceSet, path: &str) -> Result<RgbaImage> {
    let bytes = resources.read(path).map_err(|source| AtlasError::Io {
        path: PathBuf::from(path),
        source,
    })?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

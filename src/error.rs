use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("texture ({width}x{height}) exceeds the maximum sheet size ({max}x{max})", max = crate::model::MAX_SHEET_SIZE)]
    OversizedEntry { width: u32, height: u32 },
    #[error(
        "texture size ({width}x{height}) must be a multiple of the cell size ({cell_width}x{cell_height})"
    )]
    InvalidDimensions {
        width: u32,
        height: u32,
        cell_width: u32,
        cell_height: u32,
    },
    #[error("atlas is dirty, call pack() first")]
    DirtyAtlas,
    #[error("id {0} does not exist in the atlas")]
    UnknownId(u32),
    #[error("slice frame {frame} out of bounds (len {len})")]
    FrameOutOfBounds { frame: u32, len: u32 },
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, AtlasError>;

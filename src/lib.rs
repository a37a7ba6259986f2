//! Packs independently-sourced sprites into shared texture sheets.
//!
//! - Sources: in-memory RGBA buffers, image files, embedded resources, and
//!   regular sprite-sheet grids sliced into frames.
//! - Packing: shelf/guillotine splitting with first-fit over free
//!   rectangles, multi-sheet overflow, sheets capped at 8192 per edge.
//! - Handles: copyable `TextureId`/`SliceId` values resolve against the
//!   atlas to a sheet rectangle and dispatch draws to an external
//!   `RenderTarget`.
//!
//! Quick example:
//! ```ignore
//! use image::RgbaImage;
//! use sprite_atlas::prelude::*;
//! # fn main() -> sprite_atlas::Result<()> {
//! let mut atlas = Atlas::new();
//! let hero = atlas.add_image(RgbaImage::new(32, 32))?;
//! let tiles = atlas.slice_file("tiles.png", (16, 16))?;
//! atlas.pack()?;
//! println!("hero is {:?}", hero.bounds(&atlas)?);
//! println!("tile 3 is {:?}", tiles.bounds(&atlas, 3)?);
//! # Ok(()) }
//! ```

pub mod atlas;
pub mod compositing;
pub mod entry;
pub mod error;
pub mod group;
pub mod handle;
pub mod model;
pub mod packer;
pub mod render;

pub use atlas::Atlas;
pub use entry::{Entry, ResourceSet, Source};
pub use error::{AtlasError, Result};
pub use group::Group;
pub use handle::{SliceId, TextureId};
pub use model::{Location, MAX_SHEET_SIZE, Rect, RectF};
pub use packer::{PackLayout, PackRequest, SheetLayout};
pub use render::{RenderTarget, Sprite, Transform};

/// Convenience prelude for common types.
/// Importing `sprite_atlas::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::atlas::Atlas;
    pub use crate::entry::ResourceSet;
    pub use crate::error::{AtlasError, Result};
    pub use crate::group::Group;
    pub use crate::handle::{SliceId, TextureId};
    pub use crate::model::{Location, MAX_SHEET_SIZE, Rect, RectF};
    pub use crate::render::{RenderTarget, Sprite, Transform};
}

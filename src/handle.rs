use crate::atlas::Atlas;
use crate::error::{AtlasError, Result};
use crate::model::{Rect, RectF};
use crate::render::{RenderTarget, Transform};

/// Opaque reference to a packed texture.
///
/// Handles are plain ids; every resolution takes an explicit atlas borrow,
/// so a handle can outlive packs (and even the atlas). Resolving an id that
/// was never packed, or was removed by a group clear, fails with
/// `UnknownId`; resolving against a dirty atlas fails with `DirtyAtlas`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId {
    id: u32,
}

impl TextureId {
    pub(crate) fn new(id: u32) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Size of the texture as a rect at the origin, in top-left-origin
    /// Y-down pixel space, independent of where it sits in its sheet.
    pub fn bounds(&self, atlas: &Atlas) -> Result<Rect> {
        let loc = atlas.location(self.id)?;
        Ok(Rect::new(0, 0, loc.rect.w, loc.rect.h))
    }

    /// The texture's frame within its sheet, mirrored to the renderer's
    /// Y-up convention.
    pub fn frame(&self, atlas: &Atlas) -> Result<RectF> {
        atlas.resolve_frame(self.id)
    }

    /// Issues one draw call for this texture against `target`.
    ///
    /// The sprite (sheet index + flipped frame) is built on the first call
    /// and cached in the atlas until the next pack.
    pub fn draw<T: RenderTarget>(
        &self,
        atlas: &mut Atlas,
        target: &mut T,
        transform: Transform,
    ) -> Result<()> {
        let sprite = atlas.sprite(self.id)?;
        target.draw_sprite(sprite.sheet, sprite.frame, transform);
        Ok(())
    }
}

/// Reference to a grid-sliced texture: `len` sequential frames in row-major
/// cell order, all on the same sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SliceId {
    start: TextureId,
    len: u32,
}

impl SliceId {
    pub(crate) fn new(start: TextureId, len: u32) -> Self {
        Self { start, len }
    }

    pub fn start(&self) -> TextureId {
        self.start
    }

    /// Number of frames in the slice.
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the handle for the `n`-th frame. Out of range is an error,
    /// never a clamp.
    pub fn frame(&self, n: u32) -> Result<TextureId> {
        if n >= self.len {
            return Err(AtlasError::FrameOutOfBounds {
                frame: n,
                len: self.len,
            });
        }
        Ok(TextureId::new(self.start.id + n))
    }

    /// Size of the `n`-th frame.
    pub fn bounds(&self, atlas: &Atlas, n: u32) -> Result<Rect> {
        self.frame(n)?.bounds(atlas)
    }

    /// Draws the `n`-th frame against `target`.
    pub fn draw<T: RenderTarget>(
        &self,
        atlas: &mut Atlas,
        target: &mut T,
        transform: Transform,
        n: u32,
    ) -> Result<()> {
        self.frame(n)?.draw(atlas, target, transform)
    }
}

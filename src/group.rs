use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;

use crate::atlas::Atlas;
use crate::entry::ResourceSet;
use crate::error::Result;
use crate::handle::{SliceId, TextureId};

/// A named subset of ids within one atlas, for bulk removal.
///
/// A group owns no pixel data and holds no reference to its atlas; it only
/// records the ids registered through it so `Atlas::clear` can drop them
/// together without discarding the rest of the atlas.
#[derive(Debug, Default)]
pub struct Group {
    pub(crate) textures: Vec<TextureId>,
    pub(crate) slices: Vec<SliceId>,
}

impl Group {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an in-memory image and records it in this group.
    pub fn add_image(&mut self, atlas: &mut Atlas, image: RgbaImage) -> Result<TextureId> {
        let id = atlas.add_image(image)?;
        self.textures.push(id);
        Ok(id)
    }

    /// Registers an image file and records it in this group.
    pub fn add_file(&mut self, atlas: &mut Atlas, path: impl AsRef<Path>) -> Result<TextureId> {
        let id = atlas.add_file(path)?;
        self.textures.push(id);
        Ok(id)
    }

    /// Registers an embedded image and records it in this group.
    pub fn add_embedded(
        &mut self,
        atlas: &mut Atlas,
        resources: Arc<dyn ResourceSet>,
        path: &str,
    ) -> Result<TextureId> {
        let id = atlas.add_embedded(resources, path)?;
        self.textures.push(id);
        Ok(id)
    }

    /// Registers a grid-sliced in-memory image and records it in this group.
    pub fn slice_image(
        &mut self,
        atlas: &mut Atlas,
        image: RgbaImage,
        cell: (u32, u32),
    ) -> Result<SliceId> {
        let id = atlas.slice_image(image, cell)?;
        self.slices.push(id);
        Ok(id)
    }

    /// Registers a grid-sliced image file and records it in this group.
    pub fn slice_file(
        &mut self,
        atlas: &mut Atlas,
        path: impl AsRef<Path>,
        cell: (u32, u32),
    ) -> Result<SliceId> {
        let id = atlas.slice_file(path, cell)?;
        self.slices.push(id);
        Ok(id)
    }

    /// Registers a grid-sliced embedded image and records it in this group.
    pub fn slice_embedded(
        &mut self,
        atlas: &mut Atlas,
        resources: Arc<dyn ResourceSet>,
        path: &str,
        cell: (u32, u32),
    ) -> Result<SliceId> {
        let id = atlas.slice_embedded(resources, path, cell)?;
        self.slices.push(id);
        Ok(id)
    }
}

impl Atlas {
    /// Removes texture groups from the atlas; with no groups, every packed
    /// id is removed.
    ///
    /// Removal is logical (the location index only) followed by an implicit
    /// pack, so surviving textures are reconstituted from the current
    /// sheets and the atlas is immediately query-safe again.
    pub fn clear(&mut self, groups: &[Group]) -> Result<()> {
        if groups.is_empty() {
            self.locations.clear();
        }
        for group in groups {
            for t in &group.textures {
                self.locations.remove(&t.id());
            }
            for s in &group.slices {
                for i in 0..s.len() {
                    self.locations.remove(&(s.start().id() + i));
                }
            }
        }
        self.clean = false;
        self.invalidate_sprites();
        self.pack()
    }
}

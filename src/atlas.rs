use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use tracing::{debug, instrument};

use crate::compositing;
use crate::entry::{self, Entry, ResourceSet, Source};
use crate::error::{AtlasError, Result};
use crate::handle::{SliceId, TextureId};
use crate::model::{Location, MAX_SHEET_SIZE, RectF};
use crate::packer::{self, PackRequest};
use crate::render::Sprite;

/// Owns pending registrations, the composed sheet buffers and the
/// id-to-rectangle index.
///
/// Registration (`add_*`/`slice_*`) is pure bookkeeping and marks the atlas
/// dirty; `pack` runs the shelf packer and composes the sheets; handles
/// resolve against a clean atlas. All mutation takes `&mut self`, so packing
/// and resolution are naturally non-reentrant.
pub struct Atlas {
    pub(crate) pending: Vec<Entry>,
    pub(crate) sheets: Vec<RgbaImage>,
    pub(crate) locations: HashMap<u32, Location>,
    pub(crate) next_id: u32,
    pub(crate) clean: bool,
    sprites: HashMap<u32, Sprite>,
}

struct Prepared {
    id: u32,
    width: u32,
    height: u32,
    cell: Option<(u32, u32)>,
    pixels: RgbaImage,
}

impl Default for Atlas {
    fn default() -> Self {
        Self::new()
    }
}

impl Atlas {
    /// Creates an empty atlas. An atlas with no registrations is clean.
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            sheets: Vec::new(),
            locations: HashMap::new(),
            next_id: 0,
            clean: true,
            sprites: HashMap::new(),
        }
    }

    /// True when the sheets and index reflect every registration.
    pub fn is_clean(&self) -> bool {
        self.clean
    }

    /// Number of packed textures currently resolvable.
    pub fn texture_count(&self) -> usize {
        self.locations.len()
    }

    /// Returns a handle for `id`. The id is not checked here; resolution
    /// fails with `UnknownId` if it was never packed.
    pub fn get(&self, id: u32) -> TextureId {
        TextureId::new(id)
    }

    /// Registers an in-memory image. Its pixels are owned by the atlas until
    /// the next pack consumes them.
    pub fn add_image(&mut self, image: RgbaImage) -> Result<TextureId> {
        let (w, h) = image.dimensions();
        check_max(w, h)?;
        Ok(TextureId::new(self.add_entry(w, h, None, Source::Pixels(image))))
    }

    /// Registers an image file. The file is decoded once here to learn its
    /// bounds and re-read on every pack.
    pub fn add_file(&mut self, path: impl AsRef<Path>) -> Result<TextureId> {
        let path = path.as_ref();
        let img = entry::load_file(path)?;
        let (w, h) = img.dimensions();
        check_max(w, h)?;
        Ok(TextureId::new(self.add_entry(w, h, None, Source::File(path.to_path_buf()))))
    }

    /// Registers an image from an embedded resource set, re-read on every
    /// pack.
    pub fn add_embedded(
        &mut self,
        resources: Arc<dyn ResourceSet>,
        path: &str,
    ) -> Result<TextureId> {
        let img = entry::load_embedded(resources.as_ref(), path)?;
        let (w, h) = img.dimensions();
        check_max(w, h)?;
        let source = Source::Embedded {
            resources,
            path: path.to_owned(),
        };
        Ok(TextureId::new(self.add_entry(w, h, None, source)))
    }

    /// Registers an in-memory image divided into a grid of `cell`-sized
    /// frames, which must evenly divide the image bounds.
    pub fn slice_image(&mut self, image: RgbaImage, cell: (u32, u32)) -> Result<SliceId> {
        let (w, h) = image.dimensions();
        check_cell(w, h, cell)?;
        let id = self.add_entry(w, h, Some(cell), Source::Pixels(image));
        Ok(SliceId::new(TextureId::new(id), slice_len(w, h, cell)))
    }

    /// Registers an image file divided into a grid of `cell`-sized frames.
    pub fn slice_file(&mut self, path: impl AsRef<Path>, cell: (u32, u32)) -> Result<SliceId> {
        let path = path.as_ref();
        let img = entry::load_file(path)?;
        let (w, h) = img.dimensions();
        check_cell(w, h, cell)?;
        let id = self.add_entry(w, h, Some(cell), Source::File(path.to_path_buf()));
        Ok(SliceId::new(TextureId::new(id), slice_len(w, h, cell)))
    }

    /// Registers an embedded image divided into a grid of `cell`-sized
    /// frames.
    pub fn slice_embedded(
        &mut self,
        resources: Arc<dyn ResourceSet>,
        path: &str,
        cell: (u32, u32),
    ) -> Result<SliceId> {
        let img = entry::load_embedded(resources.as_ref(), path)?;
        let (w, h) = img.dimensions();
        check_cell(w, h, cell)?;
        let source = Source::Embedded {
            resources,
            path: path.to_owned(),
        };
        let id = self.add_entry(w, h, Some(cell), source);
        Ok(SliceId::new(TextureId::new(id), slice_len(w, h, cell)))
    }

    fn add_entry(&mut self, width: u32, height: u32, cell: Option<(u32, u32)>, source: Source) -> u32 {
        let id = self.next_id;
        self.next_id += match cell {
            Some((cw, ch)) => slice_len(width, height, (cw, ch)),
            None => 1,
        };
        self.pending.push(Entry {
            id,
            width,
            height,
            cell,
            source,
        });
        self.clean = false;
        id
    }

    /// Packs every pending registration, repacking previously packed
    /// textures from the current sheets.
    ///
    /// All fallible source reads happen before any state is replaced, so a
    /// failed pack leaves the previous sheets and index intact. On success
    /// the sheets, index and pending list are replaced wholesale.
    #[instrument(skip_all)]
    pub fn pack(&mut self) -> Result<()> {
        if self.clean {
            return Ok(());
        }

        let mut prepared: Vec<Prepared> =
            Vec::with_capacity(self.pending.len() + self.locations.len());
        for e in &self.pending {
            prepared.push(Prepared {
                id: e.id,
                width: e.width,
                height: e.height,
                cell: e.cell,
                pixels: e.load()?,
            });
        }
        // Surviving textures are read back from their current sheets and
        // repacked from scratch; ids removed by a clear are simply omitted.
        // Slice cells were already expanded to per-cell ids, so each comes
        // back as a plain entry.
        for (&id, loc) in &self.locations {
            prepared.push(Prepared {
                id,
                width: loc.rect.w,
                height: loc.rect.h,
                cell: None,
                pixels: compositing::copy_region(&self.sheets[loc.sheet], &loc.rect),
            });
        }

        let requests: Vec<PackRequest> = prepared
            .iter()
            .map(|p| PackRequest {
                id: p.id,
                width: p.width,
                height: p.height,
                cell: p.cell,
            })
            .collect();
        let layout = packer::pack(requests)?;

        let mut sheets: Vec<RgbaImage> = layout
            .sheets
            .iter()
            .map(|s| RgbaImage::new(s.width, s.height))
            .collect();
        let by_id: HashMap<u32, &Prepared> = prepared.iter().map(|p| (p.id, p)).collect();
        for (i, sheet) in layout.sheets.iter().enumerate() {
            for (id, rect) in &sheet.placements {
                if let Some(p) = by_id.get(id) {
                    compositing::blit(&p.pixels, &mut sheets[i], rect.x, rect.y);
                }
            }
        }

        debug!(
            sheets = sheets.len(),
            textures = layout.locations.len(),
            "packed atlas"
        );
        self.sheets = sheets;
        self.locations = layout.locations;
        self.pending.clear();
        self.sprites.clear();
        self.clean = true;
        Ok(())
    }

    /// Writes each sheet to `<dir>/<index>.png`.
    ///
    /// A debugging aid: no location metadata is emitted, so the dumped files
    /// cannot be loaded back to recover per-id rectangles.
    pub fn dump(&self, dir: impl AsRef<Path>) -> Result<()> {
        if !self.clean {
            return Err(AtlasError::DirtyAtlas);
        }
        for (i, sheet) in self.sheets.iter().enumerate() {
            let path = dir.as_ref().join(format!("{i}.png"));
            sheet.save(&path).map_err(|e| match e {
                image::ImageError::IoError(source) => AtlasError::Io {
                    path: path.clone(),
                    source,
                },
                other => AtlasError::Image(other),
            })?;
        }
        Ok(())
    }

    /// Borrows the composed sheet buffers.
    pub fn sheets(&self) -> Result<&[RgbaImage]> {
        if !self.clean {
            return Err(AtlasError::DirtyAtlas);
        }
        Ok(&self.sheets)
    }

    /// Clones the composed sheet buffers, e.g. for upload to the GPU.
    pub fn sheet_images(&self) -> Result<Vec<RgbaImage>> {
        Ok(self.sheets()?.to_vec())
    }

    /// Resolves `id` to its sheet index and rectangle.
    pub fn location(&self, id: u32) -> Result<Location> {
        if !self.clean {
            return Err(AtlasError::DirtyAtlas);
        }
        self.locations
            .get(&id)
            .copied()
            .ok_or(AtlasError::UnknownId(id))
    }

    /// Resolves `id` to its frame within its sheet, mirrored about the
    /// sheet's vertical center: sheets are stored row-major top-to-bottom
    /// while the consuming renderer is Y-up.
    pub(crate) fn resolve_frame(&self, id: u32) -> Result<RectF> {
        let loc = self.location(id)?;
        let sheet_h = self.sheets[loc.sheet].height() as f32;
        let r = &loc.rect;
        Ok(RectF::new(
            r.x as f32,
            sheet_h - (r.y + r.h) as f32,
            (r.x + r.w) as f32,
            sheet_h - r.y as f32,
        ))
    }

    /// Returns the cached sprite for `id`, building it on first use. The
    /// cache is invalidated by every pack.
    pub(crate) fn sprite(&mut self, id: u32) -> Result<Sprite> {
        if let Some(s) = self.sprites.get(&id) {
            return Ok(*s);
        }
        let loc = self.location(id)?;
        let sprite = Sprite {
            sheet: loc.sheet,
            frame: self.resolve_frame(id)?,
        };
        self.sprites.insert(id, sprite);
        Ok(sprite)
    }

    pub(crate) fn invalidate_sprites(&mut self) {
        self.sprites.clear();
    }
}

fn check_max(width: u32, height: u32) -> Result<()> {
    if width > MAX_SHEET_SIZE || height > MAX_SHEET_SIZE {
        return Err(AtlasError::OversizedEntry { width, height });
    }
    Ok(())
}

fn check_cell(width: u32, height: u32, (cell_w, cell_h): (u32, u32)) -> Result<()> {
    check_max(width, height)?;
    if cell_w == 0 || cell_h == 0 || width % cell_w != 0 || height % cell_h != 0 {
        return Err(AtlasError::InvalidDimensions {
            width,
            height,
            cell_width: cell_w,
            cell_height: cell_h,
        });
    }
    Ok(())
}

fn slice_len(width: u32, height: u32, (cell_w, cell_h): (u32, u32)) -> u32 {
    (width / cell_w) * (height / cell_h)
}

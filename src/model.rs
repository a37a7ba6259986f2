use serde::{Deserialize, Serialize};

/// Maximum edge length of a single sheet, in pixels.
pub const MAX_SHEET_SIZE: u32 = 8192;

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }

    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> u32 {
        self.x + self.w.saturating_sub(1)
    }

    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h.saturating_sub(1)
    }

    /// Returns true if `r` is fully inside `self` (inclusive edges).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }

    /// Returns true if `self` and `r` share at least one pixel.
    pub fn intersects(&self, r: &Rect) -> bool {
        self.w > 0
            && self.h > 0
            && r.w > 0
            && r.h > 0
            && self.x < r.x + r.w
            && r.x < self.x + self.w
            && self.y < r.y + r.h
            && r.y < self.y + self.h
    }
}

/// Axis-aligned rectangle in floating-point render coordinates.
///
/// Resolved texture frames are handed to the renderer in this form, with the
/// Y axis already flipped to the renderer's Y-up convention.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RectF {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl RectF {
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Where a packed texture ended up: which sheet, and which rectangle in it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub sheet: usize,
    pub rect: Rect,
}

use crate::model::RectF;

/// 2D affine transform supplied by the caller at draw time.
///
/// Stored as `[a, b, c, d, tx, ty]` mapping `(x, y)` to
/// `(a*x + c*y + tx, b*x + d*y + ty)`. The atlas never interprets it; it is
/// forwarded untouched to the render target alongside the resolved frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform(pub [f32; 6]);

impl Transform {
    pub const IDENTITY: Transform = Transform([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    pub fn translation(tx: f32, ty: f32) -> Self {
        Transform([1.0, 0.0, 0.0, 1.0, tx, ty])
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// A resolved drawable: one sheet plus the texture's frame within it.
///
/// The frame is in Y-up render coordinates (already mirrored about the
/// sheet's vertical center). Built lazily on first draw and cached by the
/// atlas until the next pack invalidates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub sheet: usize,
    pub frame: RectF,
}

/// Draw-dispatch hook implemented by the external rendering backend.
///
/// The atlas issues exactly one call per draw invocation: the target is
/// expected to emit a single textured quad sampling `frame` from the
/// identified sheet, positioned by `transform`.
pub trait RenderTarget {
    fn draw_sprite(&mut self, sheet: usize, frame: RectF, transform: Transform);
}

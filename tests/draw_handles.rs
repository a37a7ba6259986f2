use image::{Rgba, RgbaImage};
use sprite_atlas::prelude::*;

#[derive(Default)]
struct RecordingTarget {
    calls: Vec<(usize, RectF, Transform)>,
}

impl RenderTarget for RecordingTarget {
    fn draw_sprite(&mut self, sheet: usize, frame: RectF, transform: Transform) {
        self.calls.push((sheet, frame, transform));
    }
}

#[test]
fn draw_dispatches_one_call_per_invocation() {
    let mut atlas = Atlas::new();
    let id = atlas
        .add_image(RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255])))
        .expect("add");
    atlas.pack().expect("pack");

    let mut target = RecordingTarget::default();
    id.draw(&mut atlas, &mut target, Transform::IDENTITY)
        .expect("draw");
    id.draw(&mut atlas, &mut target, Transform::translation(3.0, 4.0))
        .expect("draw again");

    assert_eq!(target.calls.len(), 2);
    // The cached sprite is reused; only the transform differs.
    assert_eq!(target.calls[0].0, target.calls[1].0);
    assert_eq!(target.calls[0].1, target.calls[1].1);
    assert_eq!(target.calls[1].2, Transform::translation(3.0, 4.0));
}

#[test]
fn frame_is_mirrored_about_the_sheet_center() {
    let mut atlas = Atlas::new();
    let a = atlas
        .add_image(RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255])))
        .expect("add a");
    let b = atlas
        .add_image(RgbaImage::from_pixel(4, 2, Rgba([5, 5, 5, 255])))
        .expect("add b");
    atlas.pack().expect("pack");

    let sheets = atlas.sheets().expect("sheets");
    for id in [a, b] {
        let loc = atlas.location(id.id()).expect("location");
        let sheet_h = sheets[loc.sheet].height() as f32;
        let frame = id.frame(&atlas).expect("frame");
        assert_eq!(frame.min_x, loc.rect.x as f32);
        assert_eq!(frame.max_x, (loc.rect.x + loc.rect.w) as f32);
        assert_eq!(frame.min_y, sheet_h - (loc.rect.y + loc.rect.h) as f32);
        assert_eq!(frame.max_y, sheet_h - loc.rect.y as f32);
        assert_eq!(frame.width(), loc.rect.w as f32);
        assert_eq!(frame.height(), loc.rect.h as f32);
    }
}

#[test]
fn bounds_are_size_only_and_y_down() {
    let mut atlas = Atlas::new();
    let a = atlas
        .add_image(RgbaImage::from_pixel(8, 8, Rgba([1, 1, 1, 255])))
        .expect("add a");
    let b = atlas
        .add_image(RgbaImage::from_pixel(3, 5, Rgba([2, 2, 2, 255])))
        .expect("add b");
    atlas.pack().expect("pack");

    assert_eq!(a.bounds(&atlas).expect("a"), Rect::new(0, 0, 8, 8));
    assert_eq!(b.bounds(&atlas).expect("b"), Rect::new(0, 0, 3, 5));
}

#[test]
fn draw_fails_on_dirty_atlas_and_unknown_id() {
    let mut atlas = Atlas::new();
    let id = atlas
        .add_image(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255])))
        .expect("add");

    let mut target = RecordingTarget::default();
    assert!(matches!(
        id.draw(&mut atlas, &mut target, Transform::IDENTITY),
        Err(AtlasError::DirtyAtlas)
    ));

    atlas.pack().expect("pack");
    let stranger = atlas.get(42);
    assert!(matches!(
        stranger.draw(&mut atlas, &mut target, Transform::IDENTITY),
        Err(AtlasError::UnknownId(42))
    ));
    assert!(target.calls.is_empty());
}

#[test]
fn slice_draw_uses_the_requested_frame() {
    let mut atlas = Atlas::new();
    let slice = atlas
        .slice_image(RgbaImage::new(32, 16), (16, 16))
        .expect("slice");
    atlas.pack().expect("pack");

    let mut target = RecordingTarget::default();
    slice
        .draw(&mut atlas, &mut target, Transform::IDENTITY, 1)
        .expect("draw");
    assert_eq!(target.calls.len(), 1);

    let cell = atlas
        .location(slice.frame(1).expect("frame").id())
        .expect("location");
    assert_eq!(target.calls[0].1.min_x, cell.rect.x as f32);

    assert!(matches!(
        slice.draw(&mut atlas, &mut target, Transform::IDENTITY, 2),
        Err(AtlasError::FrameOutOfBounds { .. })
    ));
}

//! Pixel output for annotations via `image` and `imageproc`.
//!
//! Available when the `image-io` feature is enabled. Outlines and caption
//! backgrounds are drawn; caption glyphs are not.

use crate::detector::Frame;
use crate::geometry::BoundingBox;
use crate::render::{Annotation, Rgb};
use crate::util::{DetMergeError, DetMergeResult};
use image::RgbImage;
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use std::path::Path;

impl From<Rgb> for image::Rgb<u8> {
    fn from(value: Rgb) -> Self {
        image::Rgb(value.0)
    }
}

/// Loads an image from disk as 8-bit RGB.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> DetMergeResult<RgbImage> {
    let img = image::open(path).map_err(|err| DetMergeError::ImageIo {
        reason: err.to_string(),
    })?;
    Ok(img.to_rgb8())
}

/// Saves an image, picking the encoder from the file extension.
pub fn save_image<P: AsRef<Path>>(image: &RgbImage, path: P) -> DetMergeResult<()> {
    image.save(path).map_err(|err| DetMergeError::ImageIo {
        reason: err.to_string(),
    })
}

/// Frame description for an image buffer.
pub fn frame_of(image: &RgbImage) -> Frame {
    Frame::new(image.width(), image.height())
}

/// Draws outlines and caption backgrounds onto `image`.
///
/// Shapes are clipped to the image; boxes entirely outside it draw nothing.
pub fn draw_annotations(image: &mut RgbImage, annotations: &[Annotation]) {
    let (width, height) = image.dimensions();
    for annotation in annotations {
        let color: image::Rgb<u8> = annotation.color.into();
        for inset in 0..annotation.outline_width {
            if let Some(rect) = inset_rect(&annotation.bbox, inset, width, height) {
                draw_hollow_rect_mut(image, rect, color);
            }
        }
        if let Some(rect) = inset_rect(&annotation.caption_box, 0, width, height) {
            draw_filled_rect_mut(image, rect, color);
        }
    }
}

/// Integer rectangle for `bbox` shrunk by `inset` on every side, `None` when
/// nothing is left.
///
/// Edges are clamped to one pixel beyond a `width` x `height` image, so an
/// edge that lies off the image stays off it and the arithmetic cannot
/// overflow however far out the box reaches.
fn inset_rect(bbox: &BoundingBox, inset: u32, width: u32, height: u32) -> Option<Rect> {
    let inset = i64::from(inset);
    let max_x = i64::from(width) + 1;
    let max_y = i64::from(height) + 1;
    // `f32 as i64` saturates and maps NaN to 0.
    let x1 = (bbox.x1.round() as i64).saturating_add(inset).clamp(-1, max_x);
    let y1 = (bbox.y1.round() as i64).saturating_add(inset).clamp(-1, max_y);
    let x2 = (bbox.x2.round() as i64).saturating_sub(inset).clamp(-1, max_x);
    let y2 = (bbox.y2.round() as i64).saturating_sub(inset).clamp(-1, max_y);
    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    Some(Rect::at(x1 as i32, y1 as i32).of_size((x2 - x1) as u32, (y2 - y1) as u32))
}

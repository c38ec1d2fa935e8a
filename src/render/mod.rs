//! Annotation planning for merged detections.
//!
//! Rendering sits downstream of the merge core and never feeds back into it.
//! This module decides what to draw: outline colour per label from an
//! injected [`ColorTable`], caption text, font size relative to the frame,
//! and where the caption background goes. Pixel output lives in
//! [`draw`] behind the `image-io` feature; glyph rasterisation is left to the
//! caller.

use crate::candidate::detection::{Detection, Label};
use crate::detector::Frame;
use crate::geometry::BoundingBox;
use std::collections::HashMap;

#[cfg(feature = "image-io")]
pub mod draw;

/// Frame side length at which captions use the base font size.
pub const REFERENCE_SIDE: f32 = 640.0;

/// 8-bit RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const WHITE: Rgb = Rgb([255, 255, 255]);
    pub const RED: Rgb = Rgb([255, 0, 0]);
    pub const GREEN: Rgb = Rgb([0, 255, 0]);
    pub const BLUE: Rgb = Rgb([0, 0, 255]);
    pub const MAGENTA: Rgb = Rgb([255, 0, 255]);
    pub const CYAN: Rgb = Rgb([0, 255, 255]);
}

/// Label to colour lookup with a fallback for unknown labels.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorTable {
    colors: HashMap<String, Rgb>,
    default_color: Rgb,
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::new(Rgb::WHITE)
    }
}

impl ColorTable {
    /// Creates an empty table; every label maps to `default_color`.
    pub fn new(default_color: Rgb) -> Self {
        Self {
            colors: HashMap::new(),
            default_color,
        }
    }

    /// Palette for the fish disease classes, white for anything else.
    pub fn fish_disease() -> Self {
        Self::default()
            .with_color("Bacterial Diseases", Rgb::RED)
            .with_color("Fungal Diseases", Rgb::BLUE)
            .with_color("Healthy Fish", Rgb::GREEN)
            .with_color("Parasitic Diseases", Rgb::MAGENTA)
            .with_color("White Tail Diseases", Rgb::CYAN)
    }

    /// Replaces the fallback colour.
    pub fn with_default_color(mut self, color: Rgb) -> Self {
        self.default_color = color;
        self
    }

    /// Builder form of [`ColorTable::insert`].
    pub fn with_color(mut self, label: impl Into<String>, color: Rgb) -> Self {
        self.insert(label, color);
        self
    }

    /// Sets the colour for `label`.
    pub fn insert(&mut self, label: impl Into<String>, color: Rgb) {
        self.colors.insert(label.into(), color);
    }

    /// Colour for `label`, or the default.
    pub fn color_for(&self, label: &Label) -> Rgb {
        self.colors
            .get(label.as_str())
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Fallback colour.
    pub fn default_color(&self) -> Rgb {
        self.default_color
    }
}

/// Drawing parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderStyle {
    /// Outline thickness in pixels, drawn inward from the box edge.
    pub outline_width: u32,
    /// Caption font size for frames up to [`REFERENCE_SIDE`].
    pub base_font_size: u32,
    /// Caption text colour.
    pub caption_color: Rgb,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            outline_width: 3,
            base_font_size: 20,
            caption_color: Rgb::WHITE,
        }
    }
}

/// Measures caption text for layout.
pub trait TextMetrics {
    /// Returns `(width, height)` of `text` at `font_size`, in pixels.
    fn measure(&self, text: &str, font_size: u32) -> (f32, f32);
}

/// Fixed-advance estimate used when no real font is available.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApproxMetrics {
    /// Advance per character as a fraction of the font size.
    pub advance_ratio: f32,
}

impl Default for ApproxMetrics {
    fn default() -> Self {
        Self { advance_ratio: 0.6 }
    }
}

impl TextMetrics for ApproxMetrics {
    fn measure(&self, text: &str, font_size: u32) -> (f32, f32) {
        let size = font_size as f32;
        let width = text.chars().count() as f32 * size * self.advance_ratio;
        (width, size)
    }
}

/// Caption font size for a frame: the base size, scaled up for frames whose
/// short side exceeds [`REFERENCE_SIDE`], never scaled down.
pub fn font_size_for(frame: Frame, base_font_size: u32) -> u32 {
    let short_side = frame.width.min(frame.height) as f32;
    let scaled = (base_font_size as f32 * short_side / REFERENCE_SIDE) as u32;
    base_font_size.max(scaled)
}

/// Caption text for a detection, e.g. `"Healthy Fish: 0.93"`.
pub fn caption(detection: &Detection) -> String {
    format!("{}: {:.2}", detection.label(), detection.confidence())
}

/// Everything needed to draw one detection.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    /// Detection box.
    pub bbox: BoundingBox,
    /// Outline and caption background colour.
    pub color: Rgb,
    /// Outline thickness.
    pub outline_width: u32,
    /// Caption text.
    pub caption: String,
    /// Caption font size.
    pub font_size: u32,
    /// Caption text colour.
    pub caption_color: Rgb,
    /// Caption background, sitting on top of the box's upper-left corner.
    pub caption_box: BoundingBox,
}

/// Lays out annotations for `detections` in the given order.
pub fn plan_annotations(
    detections: &[Detection],
    frame: Frame,
    colors: &ColorTable,
    style: &RenderStyle,
    metrics: &dyn TextMetrics,
) -> Vec<Annotation> {
    let font_size = font_size_for(frame, style.base_font_size);
    detections
        .iter()
        .map(|det| {
            let bbox = *det.bbox();
            let caption = caption(det);
            let (text_w, text_h) = metrics.measure(&caption, font_size);
            Annotation {
                bbox,
                color: colors.color_for(det.label()),
                outline_width: style.outline_width,
                caption,
                font_size,
                caption_color: style.caption_color,
                caption_box: BoundingBox::new(
                    bbox.x1,
                    bbox.y1 - text_h,
                    bbox.x1 + text_w,
                    bbox.y1,
                ),
            }
        })
        .collect()
}

//! Axis-aligned box geometry and intersection-over-union.
//!
//! Boxes use corner coordinates `(x1, y1, x2, y2)` in image pixels. The
//! ordering `x1 <= x2`, `y1 <= y2` is expected but not enforced: inverted or
//! zero-size boxes are valid values with zero area, and every overlap they
//! take part in is zero.

/// Axis-aligned bounding box in corner form.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    /// Left edge.
    pub x1: f32,
    /// Top edge.
    pub y1: f32,
    /// Right edge.
    pub x2: f32,
    /// Bottom edge.
    pub y2: f32,
}

impl BoundingBox {
    /// Creates a box from its corners.
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Creates a box from a top-left corner and a size.
    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Horizontal extent, zero for inverted boxes.
    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    /// Vertical extent, zero for inverted boxes.
    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    /// Box area, never negative.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Area shared with `other`, zero when the boxes do not overlap.
    pub fn intersection(&self, other: &Self) -> f32 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);
        (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0)
    }

    /// Intersection-over-union with `other`. See [`iou`].
    pub fn iou(&self, other: &Self) -> f32 {
        iou(self, other)
    }
}

/// Computes intersection-over-union of two boxes.
///
/// Returns a value in `[0, 1]`. When the union is empty (both boxes have zero
/// area) the result is `0` rather than NaN.
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let intersection = a.intersection(b);
    let union = a.area() + b.area() - intersection;
    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{iou, BoundingBox};

    #[test]
    fn inverted_box_has_zero_area() {
        let b = BoundingBox::new(10.0, 0.0, 0.0, 5.0);
        assert_eq!(b.width(), 0.0);
        assert!(b.height() > 0.0);
        assert_eq!(b.area(), 0.0);

        let flipped = BoundingBox::new(0.0, 10.0, 5.0, 0.0);
        assert!(flipped.width() > 0.0);
        assert_eq!(flipped.height(), 0.0);
        assert_eq!(flipped.area(), 0.0);
    }

    #[test]
    fn from_xywh_matches_corners() {
        let b = BoundingBox::from_xywh(2.0, 3.0, 4.0, 5.0);
        assert_eq!(b, BoundingBox::new(2.0, 3.0, 6.0, 8.0));
        assert_eq!(b.area(), 20.0);
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(10.0, 0.0, 20.0, 10.0);
        assert_eq!(a.intersection(&b), 0.0);
        assert_eq!(iou(&a, &b), 0.0);
    }

    #[test]
    fn half_overlap_matches_hand_computation() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 0.0, 15.0, 10.0);
        // 50 / (100 + 100 - 50)
        assert!((iou(&a, &b) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn contained_box_ratio_is_area_ratio() {
        let outer = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let inner = BoundingBox::new(0.0, 0.0, 5.0, 10.0);
        assert!((outer.iou(&inner) - 0.5).abs() < 1e-6);
    }
}

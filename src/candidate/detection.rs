//! Detection value types.

use crate::geometry::BoundingBox;
use std::fmt;

/// Class name attached to a detection.
///
/// The vocabulary is open: labels come from whichever model produced the
/// detection and the core never interprets them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Label(String);

impl Label {
    /// Creates a label from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One scored, classified box produced by a detector.
///
/// Detections are immutable once built; merging only decides which of them
/// survive. Confidence is carried as given, without range checks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "DetectionRecord", into = "DetectionRecord")
)]
pub struct Detection {
    bbox: BoundingBox,
    confidence: f32,
    label: Label,
}

impl Detection {
    /// Creates a detection.
    pub fn new(bbox: BoundingBox, confidence: f32, label: impl Into<Label>) -> Self {
        Self {
            bbox,
            confidence,
            label: label.into(),
        }
    }

    /// Shorthand for a detection built from corner coordinates.
    pub fn from_corners(
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        confidence: f32,
        label: impl Into<Label>,
    ) -> Self {
        Self::new(BoundingBox::new(x1, y1, x2, y2), confidence, label)
    }

    /// Returns the box.
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    /// Returns the detector's confidence score.
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    /// Returns the class label.
    pub fn label(&self) -> &Label {
        &self.label
    }
}

/// Flat wire form of a detection: `{x1, y1, x2, y2, confidence, label}`.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct DetectionRecord {
    x1: f32,
    y1: f32,
    x2: f32,
    y2: f32,
    confidence: f32,
    label: Label,
}

#[cfg(feature = "serde")]
impl From<DetectionRecord> for Detection {
    fn from(value: DetectionRecord) -> Self {
        Detection::from_corners(
            value.x1,
            value.y1,
            value.x2,
            value.y2,
            value.confidence,
            value.label,
        )
    }
}

#[cfg(feature = "serde")]
impl From<Detection> for DetectionRecord {
    fn from(value: Detection) -> Self {
        Self {
            x1: value.bbox.x1,
            y1: value.bbox.y1,
            x2: value.bbox.x2,
            y2: value.bbox.y2,
            confidence: value.confidence,
            label: value.label,
        }
    }
}

//! Detector that replays recorded raw output.
//!
//! Stands in for an inference backend: raw detections captured from a model
//! (or written by hand) are passed through the backend's thresholds on every
//! call. With the `serde` feature they can be loaded from JSON, an array of
//! `{x1, y1, x2, y2, confidence, label}` records.

use crate::candidate::detection::Detection;
use crate::detector::prefilter::apply_thresholds;
use crate::detector::{Detector, DetectorThresholds, Frame};
use crate::trace::trace_span;
use crate::util::DetMergeResult;
#[cfg(feature = "serde")]
use crate::util::DetMergeError;
#[cfg(feature = "serde")]
use std::path::Path;

/// Recorded detections exposed through the [`Detector`] interface.
#[derive(Clone, Debug)]
pub struct ReplayDetector {
    name: String,
    raw: Vec<Detection>,
    thresholds: DetectorThresholds,
}

impl ReplayDetector {
    /// Creates a detector from in-memory raw detections.
    pub fn new(
        name: impl Into<String>,
        raw: Vec<Detection>,
        thresholds: DetectorThresholds,
    ) -> Self {
        Self {
            name: name.into(),
            raw,
            thresholds,
        }
    }

    /// Parses raw detections from a JSON array.
    #[cfg(feature = "serde")]
    pub fn from_json_str(
        name: impl Into<String>,
        json: &str,
        thresholds: DetectorThresholds,
    ) -> DetMergeResult<Self> {
        let raw: Vec<Detection> =
            serde_json::from_str(json).map_err(|err| DetMergeError::SourceLoad {
                reason: err.to_string(),
            })?;
        Ok(Self::new(name, raw, thresholds))
    }

    /// Reads raw detections from a JSON file.
    #[cfg(feature = "serde")]
    pub fn from_json_file<P: AsRef<Path>>(
        name: impl Into<String>,
        path: P,
        thresholds: DetectorThresholds,
    ) -> DetMergeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| DetMergeError::SourceLoad {
            reason: format!("{}: {err}", path.display()),
        })?;
        Self::from_json_str(name, &text, thresholds)
    }

    /// Raw detections before thresholds.
    pub fn raw(&self) -> &[Detection] {
        &self.raw
    }

    /// Thresholds applied on each prediction.
    pub fn thresholds(&self) -> &DetectorThresholds {
        &self.thresholds
    }
}

impl Detector for ReplayDetector {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, _frame: &Frame) -> DetMergeResult<Vec<Detection>> {
        let _span = trace_span!("detector_predict", detector = self.name.as_str()).entered();
        Ok(apply_thresholds(self.raw.clone(), &self.thresholds))
    }
}

//! Detector boundary: backends, model selection, and ensembles.
//!
//! Inference itself is out of scope. A [`Detector`] is anything that turns a
//! frame into raw detections; the [`ModelRegistry`] resolves a selector such
//! as `"YOLOv9+RTDETR"` into an [`Ensemble`] that runs each backend in order
//! and hands their outputs to the merge core.

use crate::candidate::detection::Detection;
use crate::candidate::merge::{concat_sources, merge_with_outcome, MergeConfig, MergeOutcome};
use crate::trace::{trace_source, trace_span};
use crate::util::{DetMergeError, DetMergeResult};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub mod prefilter;
pub mod replay;

pub use prefilter::apply_thresholds;
pub use replay::ReplayDetector;

/// Separator between model names in an ensemble selector.
pub const SELECTOR_SEPARATOR: char = '+';

/// Dimensions of the image a detector runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Frame {
    /// Creates a frame description.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Inference-time filters a backend applies before its output reaches the
/// merge core.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorThresholds {
    /// Minimum confidence for a raw detection to be reported.
    pub confidence: f32,
    /// IoU above which a backend suppresses same-class duplicates.
    pub iou: f32,
}

impl Default for DetectorThresholds {
    fn default() -> Self {
        Self {
            confidence: 0.75,
            iou: 0.5,
        }
    }
}

/// A detection backend.
pub trait Detector: Send + Sync {
    /// Name used in model selectors.
    fn name(&self) -> &str;

    /// Produces detections for one frame, already filtered by the backend's
    /// own thresholds.
    fn predict(&self, frame: &Frame) -> DetMergeResult<Vec<Detection>>;
}

/// Parsed model selector: one or more model names in run order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelSelector {
    names: Vec<String>,
}

impl ModelSelector {
    /// Parses `"A"` or `"A+B+..."`.
    pub fn parse(raw: &str) -> DetMergeResult<Self> {
        let names: Vec<String> = raw
            .split(SELECTOR_SEPARATOR)
            .map(|name| name.trim().to_owned())
            .collect();
        if names.iter().any(String::is_empty) {
            return Err(DetMergeError::InvalidConfig(
                "model selector contains an empty name",
            ));
        }
        Ok(Self { names })
    }

    /// Model names in run order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// True when more than one model is selected.
    pub fn is_ensemble(&self) -> bool {
        self.names.len() > 1
    }
}

impl FromStr for ModelSelector {
    type Err = DetMergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ModelSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, name) in self.names.iter().enumerate() {
            if idx > 0 {
                write!(f, "{SELECTOR_SEPARATOR}")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

/// Named detector backends available for selection.
#[derive(Default)]
pub struct ModelRegistry {
    detectors: BTreeMap<String, Arc<dyn Detector>>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a backend under its own name, replacing any previous one.
    pub fn register<D: Detector + 'static>(&mut self, detector: D) -> &mut Self {
        self.detectors
            .insert(detector.name().to_owned(), Arc::new(detector));
        self
    }

    /// Looks up a backend by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Detector>> {
        self.detectors.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.detectors.keys().map(String::as_str)
    }

    /// Builds an ensemble for `selector`.
    ///
    /// Fails with [`DetMergeError::UnknownModel`] for the first name that is
    /// not registered.
    pub fn resolve(
        &self,
        selector: &ModelSelector,
        merge: MergeConfig,
    ) -> DetMergeResult<Ensemble> {
        let detectors = selector
            .names()
            .iter()
            .map(|name| {
                self.get(name)
                    .ok_or_else(|| DetMergeError::UnknownModel { name: name.clone() })
            })
            .collect::<DetMergeResult<Vec<_>>>()?;
        Ok(Ensemble { detectors, merge })
    }
}

/// Detections reported by one backend during an ensemble run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SourceReport {
    /// Backend name.
    pub name: String,
    /// Number of detections it produced.
    pub detections: usize,
}

/// Result of running an ensemble on one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct EnsembleOutput {
    /// Final detections, in acceptance order.
    pub detections: Vec<Detection>,
    /// Per-backend counts in run order.
    pub sources: Vec<SourceReport>,
    /// Merge counts; `None` when a single backend ran and nothing was merged.
    pub outcome: Option<MergeOutcome>,
}

/// Backends resolved from a selector, plus the merge settings.
pub struct Ensemble {
    detectors: Vec<Arc<dyn Detector>>,
    merge: MergeConfig,
}

impl Ensemble {
    /// Creates an ensemble from explicit backends.
    pub fn new(detectors: Vec<Arc<dyn Detector>>, merge: MergeConfig) -> Self {
        Self { detectors, merge }
    }

    /// Backend names in run order.
    pub fn names(&self) -> Vec<&str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Merge settings.
    pub fn merge_config(&self) -> &MergeConfig {
        &self.merge
    }

    /// Runs every backend on `frame` and merges their outputs.
    ///
    /// A single backend's output is returned as is; its own suppression has
    /// already run upstream.
    pub fn run(&self, frame: &Frame) -> DetMergeResult<EnsembleOutput> {
        let _span = trace_span!(
            "ensemble_run",
            sources = self.detectors.len(),
            width = frame.width,
            height = frame.height
        )
        .entered();

        let mut per_source = Vec::with_capacity(self.detectors.len());
        let mut sources = Vec::with_capacity(self.detectors.len());
        for detector in &self.detectors {
            let detections = detector.predict(frame)?;
            trace_source!("source_detections", count = detections.len());
            sources.push(SourceReport {
                name: detector.name().to_owned(),
                detections: detections.len(),
            });
            per_source.push(detections);
        }

        if per_source.len() == 1 {
            let detections = per_source.pop().unwrap_or_default();
            return Ok(EnsembleOutput {
                detections,
                sources,
                outcome: None,
            });
        }

        let combined = concat_sources(&per_source);
        let (detections, outcome) = merge_with_outcome(&combined, self.merge.iou_threshold);
        Ok(EnsembleOutput {
            detections,
            sources,
            outcome: Some(outcome),
        })
    }
}

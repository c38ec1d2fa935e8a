//! detmerge merges object detections from several independent detectors into
//! one de-duplicated set.
//!
//! The core is the IoU oracle in [`geometry`] and the greedy cross-source
//! suppression in [`merge()`]: candidates are concatenated source by source and
//! visited once, and a candidate overlapping an already kept detection above
//! the threshold is dropped regardless of label or confidence. Around the core
//! sit the detector boundary ([`detector`]), batch merging with optional
//! parallelism via the `rayon` feature ([`batch`]), and annotation rendering
//! ([`render`], pixel output behind `image-io`).

pub mod batch;
mod candidate;
pub mod detector;
pub mod geometry;
pub mod render;
mod trace;
pub mod util;

pub use batch::{merge_batch, ImageSources};
pub use candidate::detection::{Detection, Label};
pub use candidate::merge::{
    merge, merge_indices, merge_sources, merge_with_outcome, MergeConfig, MergeOutcome,
    DEFAULT_IOU_THRESHOLD,
};
pub use detector::{
    Detector, DetectorThresholds, Ensemble, EnsembleOutput, Frame, ModelRegistry, ModelSelector,
    ReplayDetector, SourceReport,
};
pub use geometry::{iou, BoundingBox};
pub use render::{
    plan_annotations, Annotation, ApproxMetrics, ColorTable, RenderStyle, Rgb, TextMetrics,
};
pub use util::{DetMergeError, DetMergeResult};

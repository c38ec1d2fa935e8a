//! Greedy cross-source suppression.
//!
//! Candidates are visited once, in input order. A candidate is dropped when
//! its IoU with any already kept detection is strictly above the threshold,
//! otherwise it is kept. Labels and confidences play no part: the first box
//! seen in a cluster wins, whatever its class or score.

use crate::candidate::detection::Detection;
use crate::geometry::iou;
use crate::trace::{trace_event, trace_span};

/// Default IoU threshold for cross-source merging.
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.5;

/// Merge parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergeConfig {
    /// Candidates whose IoU with a kept detection exceeds this are dropped.
    pub iou_threshold: f32,
    /// Merge independent images on the rayon pool (`rayon` feature only).
    pub parallel: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            parallel: false,
        }
    }
}

/// Counts describing one merge pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MergeOutcome {
    /// Number of candidates examined.
    pub candidates: usize,
    /// Number of candidates kept.
    pub kept: usize,
    /// Number of candidates dropped as duplicates.
    pub suppressed: usize,
}

/// Returns the input indices of the detections that survive merging.
///
/// Indices are ascending, so they describe a subsequence of `detections`.
pub fn merge_indices(detections: &[Detection], iou_threshold: f32) -> Vec<usize> {
    let mut kept: Vec<usize> = Vec::new();

    'outer: for (idx, candidate) in detections.iter().enumerate() {
        for &kept_idx in kept.iter() {
            if iou(candidate.bbox(), detections[kept_idx].bbox()) > iou_threshold {
                continue 'outer;
            }
        }
        kept.push(idx);
    }

    kept
}

/// Merges a candidate sequence, keeping the first detection of each
/// overlapping cluster.
pub fn merge(detections: &[Detection], iou_threshold: f32) -> Vec<Detection> {
    merge_with_outcome(detections, iou_threshold).0
}

/// Like [`merge`], also returning how many candidates were dropped.
pub fn merge_with_outcome(
    detections: &[Detection],
    iou_threshold: f32,
) -> (Vec<Detection>, MergeOutcome) {
    let _span = trace_span!("merge", candidates = detections.len()).entered();

    let kept: Vec<Detection> = merge_indices(detections, iou_threshold)
        .into_iter()
        .map(|idx| detections[idx].clone())
        .collect();
    let outcome = MergeOutcome {
        candidates: detections.len(),
        kept: kept.len(),
        suppressed: detections.len() - kept.len(),
    };

    trace_event!(
        "merge_result",
        candidates = outcome.candidates,
        kept = outcome.kept,
        suppressed = outcome.suppressed
    );
    (kept, outcome)
}

/// Concatenates per-source lists in source order, then merges them.
///
/// Sources are not interleaved or sorted, so every detection from the first
/// source is considered before any detection from the second.
pub fn merge_sources<S: AsRef<[Detection]>>(sources: &[S], iou_threshold: f32) -> Vec<Detection> {
    merge(&concat_sources(sources), iou_threshold)
}

pub(crate) fn concat_sources<S: AsRef<[Detection]>>(sources: &[S]) -> Vec<Detection> {
    let total = sources.iter().map(|s| s.as_ref().len()).sum();
    let mut combined = Vec::with_capacity(total);
    for source in sources {
        combined.extend_from_slice(source.as_ref());
    }
    combined
}

//! Backend-side filtering applied before detections reach the merge core.
//!
//! This mirrors what a single detector does with its raw output: drop low
//! confidence boxes, then run classic confidence-ranked, per-class NMS. It is
//! deliberately separate from the cross-source merge, which is neither.

use crate::candidate::detection::Detection;
use crate::detector::DetectorThresholds;
use crate::geometry::iou;
use crate::trace::trace_source;
use std::cmp::Ordering;

fn confidence_cmp_desc(a: &Detection, b: &Detection) -> Ordering {
    b.confidence().total_cmp(&a.confidence())
}

/// Applies a backend's confidence and IoU thresholds.
///
/// Detections with non-finite confidence or confidence below
/// `thresholds.confidence` are dropped. The rest are ranked by descending
/// confidence (stable for ties) and suppressed per label when their IoU with
/// a higher ranked detection of the same label exceeds `thresholds.iou`.
pub fn apply_thresholds(
    mut detections: Vec<Detection>,
    thresholds: &DetectorThresholds,
) -> Vec<Detection> {
    let raw = detections.len();
    detections.retain(|d| d.confidence().is_finite() && d.confidence() >= thresholds.confidence);
    detections.sort_by(confidence_cmp_desc);

    let mut kept: Vec<Detection> = Vec::with_capacity(detections.len());
    'outer: for candidate in detections {
        for prior in kept.iter() {
            if prior.label() == candidate.label()
                && iou(prior.bbox(), candidate.bbox()) > thresholds.iou
            {
                continue 'outer;
            }
        }
        kept.push(candidate);
    }

    trace_source!("prefilter_result", raw = raw, kept = kept.len());
    kept
}

#[cfg(test)]
mod tests {
    use super::apply_thresholds;
    use crate::candidate::detection::Detection;
    use crate::detector::DetectorThresholds;

    fn det(x1: f32, conf: f32, label: &str) -> Detection {
        Detection::from_corners(x1, 0.0, x1 + 10.0, 10.0, conf, label)
    }

    #[test]
    fn drops_low_and_non_finite_confidence() {
        let out = apply_thresholds(
            vec![
                det(0.0, 0.74, "a"),
                det(20.0, 0.75, "a"),
                det(40.0, f32::NAN, "a"),
            ],
            &DetectorThresholds::default(),
        );
        assert_eq!(out, vec![det(20.0, 0.75, "a")]);
    }

    #[test]
    fn keeps_highest_confidence_of_same_class_cluster() {
        let out = apply_thresholds(
            vec![det(0.0, 0.8, "a"), det(1.0, 0.95, "a")],
            &DetectorThresholds::default(),
        );
        assert_eq!(out, vec![det(1.0, 0.95, "a")]);
    }

    #[test]
    fn different_classes_survive_overlap() {
        let out = apply_thresholds(
            vec![det(0.0, 0.8, "a"), det(0.0, 0.9, "b")],
            &DetectorThresholds::default(),
        );
        assert_eq!(out, vec![det(0.0, 0.9, "b"), det(0.0, 0.8, "a")]);
    }
}

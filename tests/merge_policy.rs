use detmerge::{merge, merge_indices, merge_sources, merge_with_outcome, Detection};

fn det(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32, label: &str) -> Detection {
    Detection::from_corners(x1, y1, x2, y2, confidence, label)
}

#[test]
fn empty_input_gives_empty_output() {
    assert!(merge(&[], 0.5).is_empty());
    let (kept, outcome) = merge_with_outcome(&[], 0.5);
    assert!(kept.is_empty());
    assert_eq!(outcome.candidates, 0);
    assert_eq!(outcome.suppressed, 0);
}

#[test]
fn first_seen_wins_over_higher_confidence() {
    let a = det(0.0, 0.0, 10.0, 10.0, 0.5, "x");
    let b = det(0.0, 0.0, 10.0, 10.0, 0.99, "y");

    assert_eq!(merge(&[a.clone(), b.clone()], 0.5), vec![a.clone()]);
    assert_eq!(merge(&[b.clone(), a], 0.5), vec![b]);
}

#[test]
fn overlap_across_labels_still_suppresses() {
    let fish = det(0.0, 0.0, 100.0, 100.0, 0.8, "Healthy Fish");
    let disease = det(5.0, 5.0, 100.0, 100.0, 0.95, "Bacterial Diseases");
    let kept = merge(&[fish.clone(), disease], 0.5);
    assert_eq!(kept, vec![fish]);
}

#[test]
fn iou_equal_to_threshold_is_kept() {
    // intersection 100, union 200
    let a = det(0.0, 0.0, 10.0, 10.0, 0.9, "x");
    let b = det(0.0, 0.0, 10.0, 20.0, 0.9, "x");
    assert_eq!(a.bbox().iou(b.bbox()), 0.5);
    assert_eq!(merge(&[a.clone(), b.clone()], 0.5), vec![a, b]);
}

#[test]
fn iou_just_above_threshold_is_suppressed() {
    let a = det(0.0, 0.0, 10.0, 10.0, 0.9, "x");
    let b = det(0.0, 0.0, 10.0, 19.0, 0.9, "x");
    assert!(a.bbox().iou(b.bbox()) > 0.5);
    assert_eq!(merge(&[a.clone(), b], 0.5), vec![a]);
}

#[test]
fn threshold_one_keeps_distinct_boxes() {
    let dets = vec![
        det(0.0, 0.0, 10.0, 10.0, 0.9, "x"),
        det(0.0, 0.0, 10.0, 10.5, 0.9, "x"),
        det(0.5, 0.0, 10.0, 10.0, 0.9, "y"),
        det(100.0, 100.0, 110.0, 110.0, 0.9, "z"),
    ];
    assert_eq!(merge(&dets, 1.0), dets);
}

#[test]
fn threshold_one_keeps_identical_boxes_under_strict_comparison() {
    let dets = vec![
        det(0.0, 0.0, 10.0, 10.0, 0.9, "x"),
        det(0.0, 0.0, 10.0, 10.0, 0.7, "x"),
    ];
    assert_eq!(merge(&dets, 1.0), dets);
}

#[test]
fn suppressed_candidate_does_not_suppress_later_ones() {
    // b overlaps a and c, a and c do not overlap each other.
    let a = det(0.0, 0.0, 10.0, 10.0, 0.9, "x");
    let b = det(3.0, 0.0, 13.0, 10.0, 0.9, "x");
    let c = det(6.0, 0.0, 16.0, 10.0, 0.9, "x");
    assert!(a.bbox().iou(b.bbox()) > 0.5);
    assert!(b.bbox().iou(c.bbox()) > 0.5);
    assert!(a.bbox().iou(c.bbox()) <= 0.5);

    assert_eq!(merge_indices(&[a, b, c], 0.5), vec![0, 2]);
}

#[test]
fn result_is_an_ordered_subsequence() {
    let dets = vec![
        det(50.0, 50.0, 60.0, 60.0, 0.3, "c"),
        det(0.0, 0.0, 10.0, 10.0, 0.9, "a"),
        det(51.0, 51.0, 60.0, 60.0, 0.99, "c"),
        det(20.0, 0.0, 30.0, 10.0, 0.6, "b"),
        det(0.0, 0.0, 9.0, 10.0, 0.1, "a"),
    ];
    let kept = merge_indices(&dets, 0.5);
    assert_eq!(kept, vec![0, 1, 3]);
    assert!(kept.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn fish_scenario_keeps_first_source_and_distant_box() {
    let source1 = vec![det(0.0, 0.0, 10.0, 10.0, 0.9, "Healthy Fish")];
    let source2 = vec![
        det(1.0, 1.0, 11.0, 11.0, 0.95, "Healthy Fish"),
        det(50.0, 50.0, 60.0, 60.0, 0.8, "Fungal Diseases"),
    ];

    let merged = merge_sources(&[source1.clone(), source2.clone()], 0.5);
    assert_eq!(merged, vec![source1[0].clone(), source2[1].clone()]);
}

#[test]
fn source_order_decides_which_duplicate_survives() {
    let yolo = vec![det(0.0, 0.0, 10.0, 10.0, 0.76, "Healthy Fish")];
    let rtdetr = vec![det(0.0, 0.0, 10.0, 10.0, 0.98, "White Tail Diseases")];

    let yolo_first = merge_sources(&[yolo.as_slice(), rtdetr.as_slice()], 0.5);
    assert_eq!(yolo_first, yolo);

    let rtdetr_first = merge_sources(&[rtdetr.as_slice(), yolo.as_slice()], 0.5);
    assert_eq!(rtdetr_first, rtdetr);
}

#[test]
fn degenerate_candidates_are_never_suppressed() {
    let dets = vec![
        det(0.0, 0.0, 10.0, 10.0, 0.9, "x"),
        det(5.0, 5.0, 5.0, 5.0, 0.9, "x"),
        det(10.0, 10.0, 0.0, 0.0, 0.9, "x"),
    ];
    assert_eq!(merge(&dets, 0.0), dets);
}

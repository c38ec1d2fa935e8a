//! Merging detections for many images.
//!
//! Each image is merged on its own with no shared state. With the `rayon`
//! feature and [`MergeConfig::parallel`] set, images are spread across the
//! rayon pool; results are identical to the sequential path and stay in
//! input order.

use crate::candidate::detection::Detection;
use crate::candidate::merge::{merge_sources, MergeConfig};
use crate::trace::{trace_event, trace_span};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Per-source detection lists for one image.
pub type ImageSources = Vec<Vec<Detection>>;

/// Merges the sources of every image independently.
pub fn merge_batch(images: &[ImageSources], cfg: &MergeConfig) -> Vec<Vec<Detection>> {
    let _span = trace_span!(
        "merge_batch",
        images = images.len(),
        parallel = cfg.parallel
    )
    .entered();

    #[cfg(feature = "rayon")]
    let merged = if cfg.parallel {
        merge_batch_par(images, cfg.iou_threshold)
    } else {
        merge_batch_seq(images, cfg.iou_threshold)
    };
    #[cfg(not(feature = "rayon"))]
    let merged = merge_batch_seq(images, cfg.iou_threshold);

    trace_event!(
        "merge_batch_result",
        kept = merged.iter().map(Vec::len).sum::<usize>()
    );
    merged
}

fn merge_batch_seq(images: &[ImageSources], iou_threshold: f32) -> Vec<Vec<Detection>> {
    images
        .iter()
        .map(|sources| merge_sources(sources, iou_threshold))
        .collect()
}

#[cfg(feature = "rayon")]
fn merge_batch_par(images: &[ImageSources], iou_threshold: f32) -> Vec<Vec<Detection>> {
    images
        .par_iter()
        .map(|sources| merge_sources(sources, iou_threshold))
        .collect()
}

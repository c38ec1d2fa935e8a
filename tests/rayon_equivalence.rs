#![cfg(feature = "rayon")]

use detmerge::{merge_batch, merge_sources, Detection, ImageSources, MergeConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const LABELS: [&str; 3] = ["Healthy Fish", "Fungal Diseases", "Bacterial Diseases"];

fn random_sources(rng: &mut StdRng) -> ImageSources {
    let num_sources = rng.random_range(1..4);
    (0..num_sources)
        .map(|_| {
            let count = rng.random_range(0..40);
            (0..count)
                .map(|_| {
                    let x = rng.random_range(0.0f32..200.0);
                    let y = rng.random_range(0.0f32..200.0);
                    let w = rng.random_range(1.0f32..60.0);
                    let h = rng.random_range(1.0f32..60.0);
                    let label = LABELS[rng.random_range(0..LABELS.len())];
                    Detection::from_corners(x, y, x + w, y + h, rng.random_range(0.0..1.0), label)
                })
                .collect()
        })
        .collect()
}

#[test]
fn parallel_batch_matches_sequential() {
    let mut rng = StdRng::seed_from_u64(42);
    let images: Vec<ImageSources> = (0..64).map(|_| random_sources(&mut rng)).collect();

    let seq = merge_batch(
        &images,
        &MergeConfig {
            parallel: false,
            ..MergeConfig::default()
        },
    );
    let par = merge_batch(
        &images,
        &MergeConfig {
            parallel: true,
            ..MergeConfig::default()
        },
    );

    assert_eq!(seq, par);
    for (sources, merged) in images.iter().zip(par.iter()) {
        assert_eq!(*merged, merge_sources(sources, 0.5));
    }
}

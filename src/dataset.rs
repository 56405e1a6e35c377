use std::collections::BTreeMap;
use crate::math::matrix::PixelMatrix;
use crate::sample::CanonicalSample;

/// Samples whose mean intensity is at or below this carry too little ink to
/// train on.
pub const SPARSITY_THRESHOLD: f64 = 0.02;

/// Number of samples per label code (`-1` for unlabeled).
pub fn label_distribution(samples: &[CanonicalSample]) -> BTreeMap<i32, usize> {
    let mut distribution = BTreeMap::new();
    for sample in samples {
        *distribution.entry(sample.label_code()).or_insert(0) += 1;
    }
    distribution
}

pub fn count_for_label(samples: &[CanonicalSample], label: i32) -> usize {
    samples.iter().filter(|s| s.label_code() == label).count()
}

/// One-line summary: sample count and the most common label.  Ties go to
/// the smallest label.
pub fn describe(samples: &[CanonicalSample]) -> String {
    let distribution = label_distribution(samples);
    let mode = distribution
        .iter()
        .fold(None, |best: Option<(i32, usize)>, (&label, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((label, count)),
        });
    match mode {
        Some((label, count)) => format!(
            "Loaded {} samples, label mode {} ({} samples).",
            samples.len(), label, count
        ),
        None => "Dataset is empty or missing.".to_owned(),
    }
}

pub fn average_intensity(sample: &CanonicalSample) -> f64 {
    sample.pixels().mean()
}

/// Drops near-blank samples.
pub fn clean_sparsity(samples: Vec<CanonicalSample>) -> Vec<CanonicalSample> {
    samples
        .into_iter()
        .filter(|s| average_intensity(s) > SPARSITY_THRESHOLD)
        .collect()
}

/// Stretches values so the darkest cell is 0 and the brightest 1.  A flat
/// matrix becomes all zeros.
pub fn min_max_normalize(matrix: &PixelMatrix) -> PixelMatrix {
    let values = matrix.flatten();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    matrix.map(|v| if range == 0.0 { 0.0 } else { (v - min) / range })
}

/// Flattened, min-max normalized pixels of every sample, ready to feed a
/// classifier's input layer.
pub fn feature_vectors(samples: &[CanonicalSample]) -> Vec<Vec<f64>> {
    samples
        .iter()
        .map(|s| min_max_normalize(s.pixels()).flatten())
        .collect()
}

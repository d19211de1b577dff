//! Node feature matrix initialization

use ndarray::Array2;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use statrs::distribution::Normal;

use crate::error::PipelineError;

/// N×N identity basis: node i carries the i-th standard basis vector.
pub fn identity_features(node_count: usize) -> Array2<f32> {
    Array2::eye(node_count)
}

/// N×dim matrix of standard-normal samples from a seeded generator.
///
/// Row-major fill order, so the matrix is identical across runs for a
/// fixed (node count, dim, seed).
pub fn random_normal_features(
    node_count: usize,
    dim: usize,
    seed: u64,
) -> Result<Array2<f32>, PipelineError> {
    if dim == 0 {
        return Err(PipelineError::InvalidFeatureDim(dim));
    }

    let normal =
        Normal::new(0.0, 1.0).map_err(|e| PipelineError::Distribution(e.to_string()))?;
    let mut rng = StdRng::seed_from_u64(seed);

    Ok(Array2::from_shape_fn((node_count, dim), |_| {
        normal.sample(&mut rng) as f32
    }))
}

/// One-hot encode a label vector into an N×K matrix.
pub fn one_hot(labels: &[usize], clusters: usize) -> Array2<f32> {
    let mut encoded = Array2::zeros((labels.len(), clusters));
    for (row, &label) in labels.iter().enumerate() {
        encoded[[row, label]] = 1.0;
    }
    encoded
}

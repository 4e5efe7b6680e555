//! Per-pixel kernel density estimate.
//!
//! The slow path: every sample is scored by its distance to every
//! other sample under a Gaussian kernel, so cost is O(n²) per pixel.
//! In exchange the estimate follows multimodal pixels (a flag waving
//! between two colors) that a single Gaussian smears into nonsense.

use crate::math::{Mat3, Vec3};

use super::mle;

/// Scott's-rule bandwidth exponent for three-dimensional data,
/// `n^(-2/(d+4))` with `d = 3`.
const BANDWIDTH_EXPONENT: f32 = -2.0 / 7.0;

/// Computes the Scott's-rule bandwidth matrix for a sample set.
///
/// This is the unbiased sample covariance scaled by `n^(-2/7)`. Fewer
/// than two samples yield the zero matrix.
pub fn bandwidth_matrix(samples: &[Vec3]) -> Mat3 {
    let n = samples.len();
    if n < 2 {
        return Mat3::zero();
    }
    let (_, covariance) = mle::sample_moments(samples);
    covariance * (n as f32).powf(BANDWIDTH_EXPONENT)
}

/// Scores every sample by its leave-one-out kernel density, normalized
/// so the best-supported sample reads exactly 1.
///
/// A singular bandwidth matrix (constant pixel, collinear samples, or
/// n below 4, which cannot span three dimensions) makes every score
/// 0.0; the max-normalization step is skipped rather than dividing
/// zero by zero.
pub fn fit_evaluate(samples: &[Vec3]) -> Vec<f32> {
    let n = samples.len();
    let precision = match bandwidth_matrix(samples).try_inverse() {
        Some(inv) => inv,
        None => return vec![0.0; n],
    };

    // Symmetric pairwise kernel weights. Diagonal entries stay zero,
    // which keeps each row sum leave-one-out.
    let mut weights = vec![0.0f32; n * n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = samples[i] - samples[j];
            let k = (-0.5 * d.dot(precision * d)).exp();
            weights[i * n + j] = k;
            weights[j * n + i] = k;
        }
    }

    let mut densities: Vec<f32> = (0..n)
        .map(|i| weights[i * n..(i + 1) * n].iter().sum())
        .collect();

    let max = densities.iter().cloned().fold(0.0f32, f32::max);
    if max > 0.0 {
        for d in &mut densities {
            *d /= max;
        }
    }
    densities
}

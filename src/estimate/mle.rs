//! Closed-form multivariate Gaussian fit.
//!
//! The fast path: one pass over a pixel's samples yields mean and
//! covariance, and evaluation is a single quadratic form. The density
//! is deliberately unnormalized (no `1 / sqrt((2π)³ det Σ)` factor):
//! a sample at the mean always scores exactly 1, which is the anchor
//! the fixed segmentation thresholds are calibrated against.

use crate::math::{Mat3, Vec3};

/// Computes the sample mean and unbiased covariance of a set of
/// 3-vectors.
///
/// Uses the single-pass scatter form `(Σ xᵢxᵢᵀ - n·x̄x̄ᵀ) / (n - 1)`.
/// Fewer than two samples cannot support a covariance estimate; those
/// inputs yield the zero matrix, which downstream code treats as
/// degenerate.
pub fn sample_moments(samples: &[Vec3]) -> (Vec3, Mat3) {
    let n = samples.len();
    if n == 0 {
        return (Vec3::zero(), Mat3::zero());
    }

    let mut sum = Vec3::zero();
    let mut scatter = Mat3::zero();
    for &x in samples {
        sum += x;
        scatter = scatter + x.outer(x);
    }
    let mean = sum * (1.0 / n as f32);

    if n < 2 {
        return (mean, Mat3::zero());
    }
    let covariance = (scatter - mean.outer(mean) * n as f32) * (1.0 / (n as f32 - 1.0));
    (mean, covariance)
}

/// A fitted per-pixel Gaussian.
///
/// When the sample covariance is singular the model is degenerate: its
/// precision matrix is zero and every point evaluates to density 1.
/// Constant pixels therefore read as maximally background, which is
/// the honest answer for a pixel that never changed.
#[derive(Debug, Clone)]
pub struct GaussianModel {
    mean: Vec3,
    covariance: Mat3,
    precision: Mat3,
    degenerate: bool,
}

impl GaussianModel {
    /// Fits a Gaussian to the samples by maximum likelihood.
    pub fn fit(samples: &[Vec3]) -> Self {
        let (mean, covariance) = sample_moments(samples);
        let (precision, degenerate) = match covariance.try_inverse() {
            Some(inv) => (inv, false),
            None => (Mat3::zero(), true),
        };
        Self {
            mean,
            covariance,
            precision,
            degenerate,
        }
    }

    /// Returns the fitted mean.
    #[inline]
    pub fn mean(&self) -> Vec3 {
        self.mean
    }

    /// Returns the fitted covariance.
    #[inline]
    pub fn covariance(&self) -> Mat3 {
        self.covariance
    }

    /// Returns true if the covariance was singular.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Evaluates the unnormalized log density, `-d'Σ⁻¹d / 2`.
    ///
    /// Exactly 0 at the mean and everywhere for a degenerate model.
    /// The fitted covariance is not guaranteed positive semidefinite
    /// in float arithmetic, so near-constant sample sets can push the
    /// quadratic form negative and the result slightly above 0.
    pub fn log_density(&self, x: Vec3) -> f32 {
        let d = x - self.mean;
        -0.5 * d.dot(self.precision * d)
    }

    /// Evaluates the unnormalized density, `exp(log_density)`.
    ///
    /// Exactly 1 at the mean and for degenerate models; values from an
    /// indefinite fit can land marginally above 1 and are reported as
    /// computed, not clamped.
    pub fn density(&self, x: Vec3) -> f32 {
        self.log_density(x).exp()
    }

    /// Evaluates the density at each point of a series.
    pub fn densities(&self, xs: &[Vec3]) -> Vec<f32> {
        xs.iter().map(|&x| self.density(x)).collect()
    }
}

/// Fits a Gaussian to the samples and scores every sample under it.
///
/// This is the per-pixel unit of work for the MLE method.
pub fn fit_evaluate(samples: &[Vec3]) -> Vec<f32> {
    GaussianModel::fit(samples).densities(samples)
}

//! Density estimators for per-pixel temporal samples.
//!
//! Two per-pixel estimators share one calling convention: take a
//! pixel's N transformed samples, give back N densities scoring how
//! typical each sample is of that pixel's history. [`mle`] fits a
//! single Gaussian in closed form, [`kde`] builds a kernel estimate
//! that follows multimodal pixels at O(n²) cost. [`MixtureModel`]
//! evaluates a two-component mixture from externally supplied
//! parameters.

pub mod kde;
pub mod mle;

mod mixture;

pub use mixture::{MixtureComponent, MixtureModel};

pub use mle::GaussianModel;

use serde::{Deserialize, Serialize};

/// Which per-pixel estimator a fit run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMethod {
    /// Closed-form Gaussian fit, O(n) per pixel.
    #[default]
    Mle,
    /// Leave-one-out kernel density estimate, O(n²) per pixel.
    Kde,
}

impl FitMethod {
    /// Scores one pixel's sample series with this estimator.
    pub fn fit_evaluate(self, samples: &[crate::math::Vec3]) -> Vec<f32> {
        match self {
            FitMethod::Mle => mle::fit_evaluate(samples),
            FitMethod::Kde => kde::fit_evaluate(samples),
        }
    }
}

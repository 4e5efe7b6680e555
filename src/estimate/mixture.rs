//! Fixed two-component Gaussian mixture evaluator.
//!
//! Takes externally estimated parameters (an EM fit, a calibration
//! pass) and scores points under the combined density. Unlike the
//! per-pixel estimators this one is properly normalized, because
//! mixing weights only mean anything between normalized components.

use std::f32::consts::PI;

use crate::math::{Mat3, Vec3};

/// Parameters of one mixture component.
#[derive(Debug, Clone, Copy)]
pub struct MixtureComponent {
    /// Mixing weight; callers usually make the two weights sum to 1.
    pub weight: f32,
    /// Component mean.
    pub mean: Vec3,
    /// Component covariance.
    pub covariance: Mat3,
}

/// One component with its evaluation constants folded in.
#[derive(Debug, Clone, Copy)]
struct Prepared {
    mean: Vec3,
    precision: Mat3,
    /// `weight / sqrt((2π)³ det Σ)`, or 0 for an unusable component.
    scale: f32,
}

impl Prepared {
    fn new(c: MixtureComponent) -> Self {
        let det = c.covariance.determinant();
        // A component whose covariance has non-positive determinant is
        // not a valid Gaussian; it contributes nothing rather than
        // injecting NaN into every query.
        let scale = if det > 0.0 {
            c.weight / (8.0 * PI * PI * PI * det).sqrt()
        } else {
            0.0
        };
        Self {
            mean: c.mean,
            precision: c.covariance.inverse(),
            scale,
        }
    }
}

/// A two-component Gaussian mixture density.
#[derive(Debug, Clone)]
pub struct MixtureModel {
    components: [Prepared; 2],
}

impl MixtureModel {
    /// Builds the evaluator, precomputing each component's precision
    /// matrix and normalization.
    pub fn new(a: MixtureComponent, b: MixtureComponent) -> Self {
        Self {
            components: [Prepared::new(a), Prepared::new(b)],
        }
    }

    /// Evaluates the mixture density at a point.
    pub fn density(&self, x: Vec3) -> f32 {
        self.components
            .iter()
            .map(|c| {
                let d = x - c.mean;
                c.scale * (-0.5 * d.dot(c.precision * d)).exp()
            })
            .sum()
    }

    /// Evaluates the mixture density at each point of a series.
    pub fn densities(&self, xs: &[Vec3]) -> Vec<f32> {
        xs.iter().map(|&x| self.density(x)).collect()
    }
}

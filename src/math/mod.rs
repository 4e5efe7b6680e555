//! Fixed-size linear algebra for three-channel color statistics.
//!
//! Everything the estimators need fits in a 3-vector and a 3x3 matrix,
//! so this module provides exactly those two types. Inversion reports
//! singularity through [`Mat3::try_inverse`]; the infallible
//! [`Mat3::inverse`] maps singular input to the zero matrix, which is
//! the degenerate-model convention the estimators build on.

mod mat3;
mod vec3;

pub use mat3::Mat3;
pub use vec3::Vec3;

//! Three-component column vector used for color samples.

use std::ops::{Add, AddAssign, Mul, Sub};

use crate::math::Mat3;

/// A 3-vector over `f32`.
///
/// Color samples live in this type after transformation, so every
/// per-pixel statistic (mean, covariance, kernel distance) is a
/// computation over `Vec3` values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    /// First component.
    pub x: f32,
    /// Second component.
    pub y: f32,
    /// Third component.
    pub z: f32,
}

impl Vec3 {
    /// Creates a vector from its three components.
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Returns the zero vector.
    #[inline]
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Returns the all-ones vector.
    #[inline]
    pub fn ones() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Computes the dot product with another vector.
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Computes the outer product `self * otherᵀ`, a 3x3 matrix.
    ///
    /// Row `i` of the result is `other` scaled by component `i` of
    /// `self`. This is the building block of every scatter matrix
    /// accumulated during fitting.
    pub fn outer(self, other: Self) -> Mat3 {
        Mat3::from_rows(other * self.x, other * self.y, other * self.z)
    }

    /// Returns true if all three components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

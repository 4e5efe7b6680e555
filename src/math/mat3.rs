//! 3x3 matrix with a closed-form adjugate inverse.
//!
//! Covariance and bandwidth matrices are the only matrices this crate
//! needs, so the type stays small: no decompositions, just the direct
//! cofactor expansion that three dimensions allow.

use std::ops::{Add, Mul, Sub};

use crate::math::Vec3;

/// A 3x3 matrix over `f32`, stored as three row vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    rows: [Vec3; 3],
}

impl Mat3 {
    /// Creates a matrix from its three rows.
    #[inline]
    pub fn from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Self {
        Self { rows: [r0, r1, r2] }
    }

    /// Returns the zero matrix.
    #[inline]
    pub fn zero() -> Self {
        Self::from_rows(Vec3::zero(), Vec3::zero(), Vec3::zero())
    }

    /// Returns the all-ones matrix.
    #[inline]
    pub fn ones() -> Self {
        Self::from_rows(Vec3::ones(), Vec3::ones(), Vec3::ones())
    }

    /// Returns the identity matrix.
    #[inline]
    pub fn identity() -> Self {
        Self::from_rows(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        )
    }

    /// Returns a diagonal matrix with the given diagonal entries.
    #[inline]
    pub fn diagonal(d: Vec3) -> Self {
        Self::from_rows(
            Vec3::new(d.x, 0.0, 0.0),
            Vec3::new(0.0, d.y, 0.0),
            Vec3::new(0.0, 0.0, d.z),
        )
    }

    /// Returns row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i > 2`.
    #[inline]
    pub fn row(&self, i: usize) -> Vec3 {
        self.rows[i]
    }

    /// Computes the determinant by cofactor expansion along the first row.
    pub fn determinant(&self) -> f32 {
        let [a, b, c] = self.rows;

        a.x * (b.y * c.z - b.z * c.y) - a.y * (b.x * c.z - b.z * c.x)
            + a.z * (b.x * c.y - b.y * c.x)
    }

    /// Computes the inverse, or `None` when the determinant is exactly zero.
    ///
    /// Singularity is decided by an exact floating-point comparison, not an
    /// epsilon. Near-singular matrices invert to numerically large results,
    /// which the density evaluators tolerate; an exactly rank-deficient
    /// scatter matrix (constant pixel, too few samples) is the case that
    /// needs a distinct answer.
    pub fn try_inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det == 0.0 {
            return None;
        }

        let [a, b, c] = self.rows;
        let adjugate = Self::from_rows(
            Vec3::new(
                b.y * c.z - b.z * c.y,
                a.z * c.y - a.y * c.z,
                a.y * b.z - a.z * b.y,
            ),
            Vec3::new(
                b.z * c.x - b.x * c.z,
                a.x * c.z - a.z * c.x,
                a.z * b.x - a.x * b.z,
            ),
            Vec3::new(
                b.x * c.y - b.y * c.x,
                a.y * c.x - a.x * c.y,
                a.x * b.y - a.y * b.x,
            ),
        );

        Some(adjugate * (1.0 / det))
    }

    /// Computes the inverse, falling back to the zero matrix when singular.
    ///
    /// The fallback is what makes degenerate per-pixel models evaluate to a
    /// constant density instead of poisoning the tensor with NaN: a zero
    /// precision matrix turns every Mahalanobis distance into zero.
    pub fn inverse(&self) -> Self {
        self.try_inverse().unwrap_or_else(Self::zero)
    }
}

impl Add for Mat3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_rows(
            self.rows[0] + rhs.rows[0],
            self.rows[1] + rhs.rows[1],
            self.rows[2] + rhs.rows[2],
        )
    }
}

impl Sub for Mat3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_rows(
            self.rows[0] - rhs.rows[0],
            self.rows[1] - rhs.rows[1],
            self.rows[2] - rhs.rows[2],
        )
    }
}

impl Mul<f32> for Mat3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::from_rows(self.rows[0] * rhs, self.rows[1] * rhs, self.rows[2] * rhs)
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    /// Matrix-vector product, treating `rhs` as a column vector.
    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        Vec3::new(
            self.rows[0].dot(rhs),
            self.rows[1].dot(rhs),
            self.rows[2].dot(rhs),
        )
    }
}

impl Mul for Mat3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let c0 = Vec3::new(rhs.rows[0].x, rhs.rows[1].x, rhs.rows[2].x);
        let c1 = Vec3::new(rhs.rows[0].y, rhs.rows[1].y, rhs.rows[2].y);
        let c2 = Vec3::new(rhs.rows[0].z, rhs.rows[1].z, rhs.rows[2].z);

        Self::from_rows(
            Vec3::new(
                self.rows[0].dot(c0),
                self.rows[0].dot(c1),
                self.rows[0].dot(c2),
            ),
            Vec3::new(
                self.rows[1].dot(c0),
                self.rows[1].dot(c1),
                self.rows[1].dot(c2),
            ),
            Vec3::new(
                self.rows[2].dot(c0),
                self.rows[2].dot(c1),
                self.rows[2].dot(c2),
            ),
        )
    }
}

//! RGB to feature-space conversion.
//!
//! Raw frames arrive as 8-bit RGB. The estimators never see those bytes
//! directly: every sample is first mapped into a three-channel feature
//! space chosen per job. The transforms are total functions, so a pixel
//! series always produces exactly one `Vec3` per frame.

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Feature space a pixel sample is expressed in before fitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorSpace {
    /// ITU-R BT.601 luma plus blue/red chroma offsets, range 0..=255
    /// per channel. Linear in RGB.
    Ycbcr,
    /// Hue, saturation, lightness with hue pre-divided by 360 so all
    /// channels land near the unit interval.
    #[default]
    Hsl,
}

impl ColorSpace {
    /// Converts one 8-bit RGB sample into this feature space.
    #[inline]
    pub fn transform(self, rgb: [u8; 3]) -> Vec3 {
        match self {
            ColorSpace::Ycbcr => ycbcr(rgb),
            ColorSpace::Hsl => hsl(rgb),
        }
    }
}

/// BT.601 YCbCr on full-range 8-bit input.
fn ycbcr([r, g, b]: [u8; 3]) -> Vec3 {
    let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));

    Vec3::new(
        0.299 * r + 0.587 * g + 0.114 * b,
        128.0 - 0.1687 * r - 0.3313 * g + 0.5 * b,
        128.0 + 0.5 * r - 0.4187 * g - 0.0813 * b,
    )
}

/// Hue/saturation/lightness via the six-sector hue formula.
///
/// Achromatic input (zero chroma) takes hue 0, and lightness exactly 0
/// or 1 takes saturation 0; both guards avoid division by zero. Hue is
/// not wrapped into [0, 1): when the max channel is red and blue
/// exceeds green the sector formula goes slightly negative, and that
/// value is kept as-is.
fn hsl([r, g, b]: [u8; 3]) -> Vec3 {
    let r = f32::from(r) / 255.0;
    let g = f32::from(g) / 255.0;
    let b = f32::from(b) / 255.0;

    let v = r.max(g).max(b);
    let c = v - r.min(g).min(b);
    let l = v - c / 2.0;

    let h = if c == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / c
    } else if v == g {
        60.0 * (2.0 + (b - r) / c)
    } else {
        60.0 * (4.0 + (r - g) / c)
    };

    let s = if l == 0.0 || l == 1.0 {
        0.0
    } else {
        (v - l) / l.min(1.0 - l)
    };

    Vec3::new(h / 360.0, s, l)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(got: Vec3, want: Vec3, tol: f32) {
        assert!(
            (got.x - want.x).abs() < tol
                && (got.y - want.y).abs() < tol
                && (got.z - want.z).abs() < tol,
            "{got:?} vs {want:?}"
        );
    }

    #[test]
    fn test_ycbcr_achromatic_has_centered_chroma() {
        // The chroma coefficients sum to zero, so gray maps to (Y, 128, 128).
        assert_vec_close(
            ColorSpace::Ycbcr.transform([0, 0, 0]),
            Vec3::new(0.0, 128.0, 128.0),
            1e-3,
        );
        assert_vec_close(
            ColorSpace::Ycbcr.transform([255, 255, 255]),
            Vec3::new(255.0, 128.0, 128.0),
            0.1,
        );
        assert_vec_close(
            ColorSpace::Ycbcr.transform([128, 128, 128]),
            Vec3::new(128.0, 128.0, 128.0),
            0.1,
        );
    }

    #[test]
    fn test_ycbcr_primaries() {
        let red = ColorSpace::Ycbcr.transform([255, 0, 0]);
        assert_vec_close(red, Vec3::new(76.245, 84.9815, 255.5), 0.1);

        let blue = ColorSpace::Ycbcr.transform([0, 0, 255]);
        assert_vec_close(blue, Vec3::new(29.07, 255.5, 107.2685), 0.1);
    }

    #[test]
    fn test_hsl_primaries_hit_their_sectors() {
        // Hue is stored divided by 360: red 0, green 1/3, blue 2/3.
        assert_vec_close(
            ColorSpace::Hsl.transform([255, 0, 0]),
            Vec3::new(0.0, 1.0, 0.5),
            1e-5,
        );
        assert_vec_close(
            ColorSpace::Hsl.transform([0, 255, 0]),
            Vec3::new(1.0 / 3.0, 1.0, 0.5),
            1e-5,
        );
        assert_vec_close(
            ColorSpace::Hsl.transform([0, 0, 255]),
            Vec3::new(2.0 / 3.0, 1.0, 0.5),
            1e-5,
        );
    }

    #[test]
    fn test_hsl_boundary_guards() {
        // Black: lightness 0 forces saturation 0; zero chroma forces hue 0.
        assert_eq!(ColorSpace::Hsl.transform([0, 0, 0]), Vec3::zero());
        // White: lightness 1 forces saturation 0.
        assert_eq!(
            ColorSpace::Hsl.transform([255, 255, 255]),
            Vec3::new(0.0, 0.0, 1.0)
        );
        // Mid gray: chromatic guards again, lightness in the open interval.
        let gray = ColorSpace::Hsl.transform([128, 128, 128]);
        assert_eq!(gray.x, 0.0);
        assert_eq!(gray.y, 0.0);
        assert!((gray.z - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_hsl_negative_hue_is_not_wrapped() {
        // Max channel red with blue above green: the sector formula goes
        // negative and stays negative.
        let v = ColorSpace::Hsl.transform([255, 0, 128]);
        assert!(v.x < 0.0 && v.x > -1.0 / 6.0 - 1e-6);
    }

    #[test]
    fn test_transforms_are_total() {
        // Coarse sweep of the RGB cube; every output must be finite.
        for r in (0..=255).step_by(17) {
            for g in (0..=255).step_by(17) {
                for b in (0..=255).step_by(17) {
                    let rgb = [r as u8, g as u8, b as u8];
                    assert!(ColorSpace::Ycbcr.transform(rgb).is_finite(), "{rgb:?}");
                    assert!(ColorSpace::Hsl.transform(rgb).is_finite(), "{rgb:?}");
                }
            }
        }
    }
}

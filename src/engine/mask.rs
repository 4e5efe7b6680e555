//! Segmentation mask output.

use serde::{Deserialize, Serialize};

/// How selected pixels are rendered into the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskMode {
    /// Every selected pixel gets full alpha 255.
    #[default]
    Binary,
    /// Selected pixels get alpha `(1 - density) * 255`, so barely
    /// atypical pixels fade out instead of popping.
    Graded,
}

impl MaskMode {
    /// Alpha for a pixel already known to be at or below threshold.
    pub(crate) fn alpha(self, density: f32) -> u8 {
        match self {
            MaskMode::Binary => 255,
            MaskMode::Graded => ((1.0 - density).max(0.0) * 255.0) as u8,
        }
    }
}

/// A per-pixel alpha mask for one frame.
///
/// Alpha 0 is background; anything above is foreground, at full
/// strength for binary masks and proportional strength for graded
/// ones. Row-major, one byte per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Mask {
    pub(crate) fn new_zeroed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Returns the mask width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the mask height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major alpha bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the alpha at `(x, y)`, or `None` out of range.
    pub fn alpha(&self, x: usize, y: usize) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// Returns whether `(x, y)` is foreground, or `None` out of range.
    pub fn is_foreground(&self, x: usize, y: usize) -> Option<bool> {
        self.alpha(x, y).map(|a| a > 0)
    }

    /// Counts pixels with nonzero alpha.
    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&a| a > 0).count()
    }

    /// Fraction of the frame marked foreground, in [0, 1].
    pub fn coverage(&self) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        self.foreground_count() as f32 / self.data.len() as f32
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

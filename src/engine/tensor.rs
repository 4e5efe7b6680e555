//! Flat storage for per-pixel density series.

/// A width x height x frames tensor of densities.
///
/// Storage is pixel-major: the N densities of one pixel are contiguous
/// (`(y * width + x) * frames + k`). Fitting writes each pixel's run
/// as one chunk, and everything downstream reads single entries by
/// index arithmetic.
#[derive(Debug, Clone)]
pub struct DensityTensor {
    width: usize,
    height: usize,
    frames: usize,
    data: Vec<f32>,
}

impl DensityTensor {
    /// Creates an all-zero tensor for the engine to fill in.
    pub(crate) fn new_zeroed(width: usize, height: usize, frames: usize) -> Self {
        Self {
            width,
            height,
            frames,
            data: vec![0.0; width * height * frames],
        }
    }

    /// Builds a tensor from raw values, or `None` when the buffer
    /// length does not match `width * height * frames`.
    pub fn from_values(width: usize, height: usize, frames: usize, data: Vec<f32>) -> Option<Self> {
        if data.len() != width * height * frames {
            return None;
        }
        Some(Self {
            width,
            height,
            frames,
            data,
        })
    }

    /// Returns the tensor width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the tensor height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of frames per pixel.
    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Returns the density of pixel `(x, y)` at frame `k`, or `None`
    /// out of range.
    pub fn get(&self, x: usize, y: usize, k: usize) -> Option<f32> {
        if x >= self.width || y >= self.height || k >= self.frames {
            return None;
        }
        Some(self.data[(y * self.width + x) * self.frames + k])
    }

    /// Returns the full density series of one pixel, or `None` out of
    /// range.
    pub fn pixel_run(&self, x: usize, y: usize) -> Option<&[f32]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = (y * self.width + x) * self.frames;
        Some(&self.data[start..start + self.frames])
    }

    /// Returns the underlying pixel-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }
}

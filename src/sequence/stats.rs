//! Whole-sequence summary statistics.
//!
//! These are inspection aids for judging whether a capture is usable
//! before spending time on density fitting: the mean image shows what
//! the static scene looks like, and the deviation map shows where the
//! scene actually moved.

use super::{Frame, Sequence};

/// Per-pixel summary of a sequence.
#[derive(Debug, Clone)]
pub struct SequenceStats {
    /// Temporal mean image, channels truncated to 8 bits.
    mean: Frame,
    /// Normalized RMS deviation per pixel, row-major, in [0, 1].
    deviation: Vec<f32>,
}

impl SequenceStats {
    /// Computes mean image and deviation map for a sequence.
    ///
    /// The deviation of a pixel is the root mean square of its RGB
    /// distance to the quantized mean image, normalized so the most
    /// active pixel reads 1.0. A perfectly static sequence yields an
    /// all-zero map rather than dividing by a zero maximum.
    pub fn analyze(seq: &Sequence) -> Self {
        let n = seq.len() as f32;
        let pixels = seq.width() as usize * seq.height() as usize;

        let mut sums = vec![0u32; pixels * 3];
        for frame in seq.frames() {
            for (acc, &b) in sums.iter_mut().zip(frame.data()) {
                *acc += u32::from(b);
            }
        }
        let mean_data: Vec<u8> = sums.iter().map(|&s| (s as f32 / n) as u8).collect();

        let mut deviation = vec![0f32; pixels];
        for frame in seq.frames() {
            let data = frame.data();
            for (p, dev) in deviation.iter_mut().enumerate() {
                let i = p * 3;
                let dr = f32::from(data[i]) - f32::from(mean_data[i]);
                let dg = f32::from(data[i + 1]) - f32::from(mean_data[i + 1]);
                let db = f32::from(data[i + 2]) - f32::from(mean_data[i + 2]);
                *dev += dr * dr + dg * dg + db * db;
            }
        }
        for dev in &mut deviation {
            *dev = (*dev / n).sqrt();
        }

        let max = deviation.iter().cloned().fold(0.0f32, f32::max);
        if max > 0.0 {
            for dev in &mut deviation {
                *dev /= max;
            }
        }

        let width = seq.width();
        let mean = Frame::from_fn(width, seq.height(), |x, y| {
            let i = (y as usize * width as usize + x as usize) * 3;
            [mean_data[i], mean_data[i + 1], mean_data[i + 2]]
        });

        Self { mean, deviation }
    }

    /// Returns the temporal mean image.
    #[inline]
    pub fn mean_image(&self) -> &Frame {
        &self.mean
    }

    /// Returns the normalized deviation map, row-major.
    #[inline]
    pub fn deviation_map(&self) -> &[f32] {
        &self.deviation
    }

    /// Returns the deviation of one pixel, or `None` out of range.
    pub fn deviation(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.mean.width() || y >= self.mean.height() {
            return None;
        }
        let p = y as usize * self.mean.width() as usize + x as usize;
        self.deviation.get(p).copied()
    }
}

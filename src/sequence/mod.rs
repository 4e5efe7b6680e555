//! Image sequence input and validation.
//!
//! A [`Sequence`] is the unit of work for the whole engine: N frames of
//! identical dimensions from a camera that did not move. Dimension
//! agreement is enforced once, at construction, so the per-pixel hot
//! paths can index freely. Frames come from a [`FrameSource`], either
//! the synthetic generator or (with the `image-io` feature) a directory
//! of image files.

mod frame;
mod source;
mod stats;

#[cfg(feature = "image-io")]
mod loader;

pub use frame::Frame;
pub use source::{FrameSource, SourceError, SyntheticSource};
pub use stats::SequenceStats;

#[cfg(feature = "image-io")]
pub use loader::{write_mask, DirectoryLoader};

use thiserror::Error;

use crate::color::ColorSpace;
use crate::math::Vec3;

/// Errors raised while assembling a sequence.
#[derive(Debug, Error)]
pub enum SequenceError {
    #[error("sequence contains no frames")]
    Empty,
    #[error("frame {index} is {got_width}x{got_height}, expected {width}x{height}")]
    DimensionMismatch {
        index: usize,
        width: u32,
        height: u32,
        got_width: u32,
        got_height: u32,
    },
    #[error("pixel buffer holds {got} bytes, expected {expected} for {width}x{height} RGB")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        got: usize,
    },
}

/// An ordered, dimension-checked stack of frames.
///
/// Index `k` is the temporal position of a frame; the engine treats the
/// N values of one pixel across all frames as that pixel's sample set.
#[derive(Debug, Clone)]
pub struct Sequence {
    frames: Vec<Frame>,
    width: u32,
    height: u32,
}

impl Sequence {
    /// Builds a sequence, verifying it is non-empty and that every
    /// frame agrees on dimensions.
    pub fn new(frames: Vec<Frame>) -> Result<Self, SequenceError> {
        let first = frames.first().ok_or(SequenceError::Empty)?;
        let (width, height) = (first.width(), first.height());

        for (index, frame) in frames.iter().enumerate() {
            if frame.width() != width || frame.height() != height {
                return Err(SequenceError::DimensionMismatch {
                    index,
                    width,
                    height,
                    got_width: frame.width(),
                    got_height: frame.height(),
                });
            }
        }

        Ok(Self {
            frames,
            width,
            height,
        })
    }

    /// Returns the number of frames.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if the sequence holds no frames.
    ///
    /// Never true for a constructed `Sequence`; provided for
    /// completeness alongside [`len`](Self::len).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Returns the shared frame width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the shared frame height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns frame `k`, or `None` past the end.
    #[inline]
    pub fn frame(&self, k: usize) -> Option<&Frame> {
        self.frames.get(k)
    }

    /// Returns all frames in temporal order.
    #[inline]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Collects the temporal sample series of one pixel, transformed
    /// into the given color space. The result has exactly `len()`
    /// entries, in frame order.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is outside the frame dimensions.
    pub fn pixel_series(&self, x: u32, y: u32, space: ColorSpace) -> Vec<Vec3> {
        self.frames
            .iter()
            .map(|frame| space.transform(frame.rgb(x, y)))
            .collect()
    }
}

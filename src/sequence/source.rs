//! Frame sources.
//!
//! A source owns the details of where frames come from and hands the
//! engine a validated [`Sequence`]. Keeping this behind a trait lets
//! the binary swap a directory of captures for the synthetic generator
//! without touching anything downstream.

use thiserror::Error;

use super::{Frame, Sequence, SequenceError};

/// Errors raised while producing frames.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no frames found: {0}")]
    NoFrames(String),
    #[error("failed to read input: {0}")]
    ReadFailed(String),
    #[error("failed to decode image: {0}")]
    DecodeFailed(String),
    #[error("failed to write image: {0}")]
    WriteFailed(String),
    #[error("invalid sequence: {0}")]
    Sequence(#[from] SequenceError),
}

/// Trait for sequence producers.
///
/// Implementations load or generate all frames up front; the engine
/// needs the complete temporal series of every pixel before it can fit
/// anything.
pub trait FrameSource {
    /// Produces the full frame sequence from this source.
    fn frames(&mut self) -> Result<Sequence, SourceError>;
}

/// Deterministic synthetic scene: a textured static background with a
/// small bright square sliding across it.
///
/// Background pixels carry a three-channel temporal jitter with
/// coprime periods, so their sample clouds span all three feature
/// dimensions and fit to well-conditioned models. Pixels visited by
/// the square see outlier samples and light up in the mask. Not a
/// statistical model of real video; intended for demos and tests.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    width: u32,
    height: u32,
    frame_count: usize,
}

impl SyntheticSource {
    /// Creates a generator for `frame_count` frames of the given size.
    pub fn new(width: u32, height: u32, frame_count: usize) -> Self {
        Self {
            width,
            height,
            frame_count,
        }
    }

    fn frame(&self, k: usize) -> Frame {
        let k = k as u32;
        let side = (self.width / 6).clamp(2, self.width.max(2));
        let range_x = self.width.saturating_sub(side) + 1;
        let range_y = self.height.saturating_sub(side) + 1;
        let (sx, sy) = ((2 * k) % range_x, k % range_y);

        Frame::from_fn(self.width, self.height, |x, y| {
            // Coprime periods keep the per-channel jitters independent.
            let jr = (x + 3 * y + 7 * k) % 5;
            let jg = (3 * x + y + 11 * k) % 7;
            let jb = (x + y + 13 * k) % 6;

            let in_square = x >= sx && x < sx + side && y >= sy && y < sy + side;
            if in_square {
                [(220 + jr) as u8, (40 + jg) as u8, (48 + jb) as u8]
            } else {
                let base = (x * 31 + y * 17) % 32;
                [
                    (96 + base + jr) as u8,
                    (112 + base + jg) as u8,
                    (104 + base + jb) as u8,
                ]
            }
        })
    }
}

impl FrameSource for SyntheticSource {
    fn frames(&mut self) -> Result<Sequence, SourceError> {
        let frames = (0..self.frame_count).map(|k| self.frame(k)).collect();
        Ok(Sequence::new(frames)?)
    }
}

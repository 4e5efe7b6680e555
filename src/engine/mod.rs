//! Density tensor engine: fit once, segment any frame.
//!
//! [`DensityEngine`] is the crate's orchestrator. Fitting walks every
//! pixel of a [`Sequence`], scores that pixel's temporal samples with
//! the configured estimator, and stores all scores in a
//! [`DensityTensor`]. Segmentation is then a cheap per-frame threshold
//! pass over the tensor; the frames themselves are never needed again.

mod mask;
mod regions;
mod tensor;

pub use mask::{Mask, MaskMode};
pub use tensor::DensityTensor;

use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;

use crate::config::EngineConfig;
use crate::sequence::Sequence;

/// Errors raised by [`DensityEngine::fit`].
#[derive(Debug, Error)]
pub enum FitError {
    #[error("sequence has {got} frame(s); fitting needs at least 2")]
    TooFewFrames { got: usize },
}

/// Errors raised by queries against the engine.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("no density tensor fitted yet; call fit() first")]
    NotFitted,
    #[error("frame index {index} out of range ({frames} frames fitted)")]
    FrameOutOfRange { index: usize, frames: usize },
    #[error("pixel ({x}, {y}) out of range for {width}x{height} tensor")]
    PixelOutOfRange {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
}

/// Per-pixel temporal density engine.
///
/// Queries made before a successful [`fit`](Self::fit) report
/// [`EvalError::NotFitted`]; refitting replaces the stored tensor.
#[derive(Debug, Default)]
pub struct DensityEngine {
    config: EngineConfig,
    tensor: Option<DensityTensor>,
}

impl DensityEngine {
    /// Creates an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            tensor: None,
        }
    }

    /// Returns the fitted tensor, if any.
    pub fn tensor(&self) -> Option<&DensityTensor> {
        self.tensor.as_ref()
    }

    /// Returns true once a tensor has been fitted.
    pub fn is_fitted(&self) -> bool {
        self.tensor.is_some()
    }

    /// Fits per-pixel density models over the whole sequence.
    ///
    /// Pixels are independent, so the per-pixel work is spread across
    /// the rayon pool: each task owns one pixel's contiguous run of
    /// tensor entries and writes nothing else. Needs at least two
    /// frames; one sample supports no covariance estimate.
    pub fn fit(&mut self, sequence: &Sequence) -> Result<(), FitError> {
        let frames = sequence.len();
        if frames < 2 {
            return Err(FitError::TooFewFrames { got: frames });
        }
        let (width, height) = (sequence.width() as usize, sequence.height() as usize);

        tracing::info!(
            width,
            height,
            frames,
            method = %self.config.method,
            color_space = %self.config.color_space,
            "Fitting per-pixel density models"
        );
        let start = Instant::now();

        let mut tensor = DensityTensor::new_zeroed(width, height, frames);
        let method = self.config.method;
        let space = self.config.color_space;

        tensor
            .as_mut_slice()
            .par_chunks_mut(frames)
            .enumerate()
            .for_each(|(p, run)| {
                let (x, y) = ((p % width) as u32, (p / width) as u32);
                let series = sequence.pixel_series(x, y, space);
                run.copy_from_slice(&method.fit_evaluate(&series));
            });

        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            pixels = width * height,
            "Density tensor fitted"
        );
        self.tensor = Some(tensor);
        Ok(())
    }

    /// Reads the fitted density of pixel `(x, y)` at frame `k`.
    pub fn density(&self, x: usize, y: usize, k: usize) -> Result<f32, EvalError> {
        let tensor = self.fitted()?;
        Self::check_frame(tensor, k)?;
        tensor.get(x, y, k).ok_or(EvalError::PixelOutOfRange {
            x,
            y,
            width: tensor.width(),
            height: tensor.height(),
        })
    }

    /// Thresholds one frame's densities into a mask.
    ///
    /// A pixel is selected when its density is at or below
    /// `threshold`; `mode` decides the alpha it renders with.
    pub fn mask(&self, frame: usize, threshold: f32, mode: MaskMode) -> Result<Mask, EvalError> {
        let tensor = self.fitted()?;
        Self::check_frame(tensor, frame)?;

        let (w, h, n) = (tensor.width(), tensor.height(), tensor.frames());
        let data = tensor.as_slice();
        let mut mask = Mask::new_zeroed(w, h);
        let out = mask.as_mut_slice();
        for (p, alpha) in out.iter_mut().enumerate() {
            let density = data[p * n + frame];
            if density <= threshold {
                *alpha = mode.alpha(density);
            }
        }

        tracing::debug!(
            frame,
            threshold,
            foreground = mask.foreground_count(),
            "Mask extracted"
        );
        Ok(mask)
    }

    /// Hysteresis segmentation: strict seeds grown through a looser
    /// threshold.
    ///
    /// The result always contains every pixel the plain mask at
    /// `seed_threshold` would select.
    pub fn spread_regions(
        &self,
        frame: usize,
        seed_threshold: f32,
        grow_threshold: f32,
    ) -> Result<Mask, EvalError> {
        let tensor = self.fitted()?;
        Self::check_frame(tensor, frame)?;

        let mask = regions::spread(tensor, frame, seed_threshold, grow_threshold);
        tracing::debug!(
            frame,
            seed_threshold,
            grow_threshold,
            foreground = mask.foreground_count(),
            "Regions spread"
        );
        Ok(mask)
    }

    fn fitted(&self) -> Result<&DensityTensor, EvalError> {
        self.tensor.as_ref().ok_or(EvalError::NotFitted)
    }

    fn check_frame(tensor: &DensityTensor, index: usize) -> Result<(), EvalError> {
        if index >= tensor.frames() {
            return Err(EvalError::FrameOutOfRange {
                index,
                frames: tensor.frames(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::estimate::FitMethod;
    use crate::sequence::{Frame, FrameSource, SyntheticSource};

    fn fitted_engine(method: FitMethod) -> DensityEngine {
        let sequence = SyntheticSource::new(12, 9, 6).frames().unwrap();
        let mut engine = DensityEngine::new(EngineConfig {
            method,
            ..EngineConfig::default()
        });
        engine.fit(&sequence).unwrap();
        engine
    }

    #[test]
    fn test_queries_before_fit_fail() {
        let engine = DensityEngine::default();

        assert!(!engine.is_fitted());
        assert!(matches!(engine.density(0, 0, 0), Err(EvalError::NotFitted)));
        assert!(matches!(
            engine.mask(0, 0.5, MaskMode::Binary),
            Err(EvalError::NotFitted)
        ));
        assert!(matches!(
            engine.spread_regions(0, 0.1, 0.2),
            Err(EvalError::NotFitted)
        ));
    }

    #[test]
    fn test_fit_rejects_single_frame() {
        let sequence = crate::sequence::Sequence::new(vec![Frame::from_fn(4, 4, |_, _| {
            [1, 2, 3]
        })])
        .unwrap();
        let mut engine = DensityEngine::default();

        assert!(matches!(
            engine.fit(&sequence),
            Err(FitError::TooFewFrames { got: 1 })
        ));
        assert!(!engine.is_fitted());
    }

    #[test]
    fn test_fit_fills_finite_densities() {
        for method in [FitMethod::Mle, FitMethod::Kde] {
            let engine = fitted_engine(method);
            let tensor = engine.tensor().unwrap();

            assert_eq!((tensor.width(), tensor.height()), (12, 9));
            assert_eq!(tensor.frames(), 6);
            for &d in tensor.as_slice() {
                assert!(d.is_finite() && d >= 0.0, "{method:?} density {d}");
            }
        }
    }

    #[test]
    fn test_kde_tensor_stays_in_unit_interval() {
        // Max-normalization bounds every pixel run by its own peak;
        // the MLE tensor carries no such ceiling.
        let engine = fitted_engine(FitMethod::Kde);

        for &d in engine.tensor().unwrap().as_slice() {
            assert!((0.0..=1.0).contains(&d), "density {d}");
        }
    }

    #[test]
    fn test_range_checked_queries() {
        let engine = fitted_engine(FitMethod::Mle);

        assert!(engine.density(11, 8, 5).is_ok());
        assert!(matches!(
            engine.density(12, 0, 0),
            Err(EvalError::PixelOutOfRange { x: 12, .. })
        ));
        assert!(matches!(
            engine.density(0, 0, 6),
            Err(EvalError::FrameOutOfRange { index: 6, frames: 6 })
        ));
        assert!(matches!(
            engine.mask(6, 0.5, MaskMode::Binary),
            Err(EvalError::FrameOutOfRange { .. })
        ));
    }

    #[test]
    fn test_threshold_extremes() {
        let engine = fitted_engine(FitMethod::Mle);
        let tensor = engine.tensor().unwrap();

        // Scatter cancellation at near-static pixels tips some fitted
        // covariances indefinite, so a few densities in this scene sit
        // above 1. The all-selecting threshold is the observed
        // maximum, not 1.
        let max = tensor.as_slice().iter().fold(0.0f32, |a, &d| a.max(d));
        assert!(max > 1.0, "tensor maximum {max}");

        let all = engine.mask(0, max, MaskMode::Binary).unwrap();
        assert_eq!(all.coverage(), 1.0);

        // Densities are never negative, so a negative threshold
        // selects nothing.
        let none = engine.mask(0, -1.0, MaskMode::Binary).unwrap();
        assert_eq!(none.foreground_count(), 0);
    }

    #[test]
    fn test_threshold_flip_on_known_density() {
        // Bypass fitting with a hand-built tensor so the flip point is
        // known exactly.
        let tensor = DensityTensor::from_values(2, 1, 1, vec![0.01, 0.9]).unwrap();
        let engine = DensityEngine {
            config: EngineConfig::default(),
            tensor: Some(tensor),
        };

        let selected = engine.mask(0, 0.1, MaskMode::Binary).unwrap();
        assert_eq!(selected.is_foreground(0, 0), Some(true));
        assert_eq!(selected.is_foreground(1, 0), Some(false));

        let flipped = engine.mask(0, 0.005, MaskMode::Binary).unwrap();
        assert_eq!(flipped.is_foreground(0, 0), Some(false));
    }

    #[test]
    fn test_threshold_flip_on_degenerate_densities() {
        // A fully static sequence: every pixel is degenerate, so MLE
        // densities are exactly 1 and the at-or-below comparison flips
        // the whole mask between thresholds 1.0 and anything smaller.
        let frames = (0..4)
            .map(|_| Frame::from_fn(6, 5, |x, y| [x as u8, y as u8, 99]))
            .collect();
        let sequence = crate::sequence::Sequence::new(frames).unwrap();

        let mut engine = DensityEngine::new(EngineConfig {
            method: FitMethod::Mle,
            ..EngineConfig::default()
        });
        engine.fit(&sequence).unwrap();
        assert_eq!(engine.density(3, 2, 1).unwrap(), 1.0);
        assert_eq!(engine.mask(0, 1.0, MaskMode::Binary).unwrap().coverage(), 1.0);
        assert_eq!(
            engine.mask(0, 0.999, MaskMode::Binary).unwrap().foreground_count(),
            0
        );

        // Under KDE the same pixels read exactly 0, which threshold 0
        // still selects.
        let mut kde = DensityEngine::new(EngineConfig {
            method: FitMethod::Kde,
            ..EngineConfig::default()
        });
        kde.fit(&sequence).unwrap();
        assert_eq!(kde.density(3, 2, 1).unwrap(), 0.0);
        assert_eq!(kde.mask(0, 0.0, MaskMode::Binary).unwrap().coverage(), 1.0);
    }

    #[test]
    fn test_outlier_frame_scores_minimum() {
        // The synthetic square covers pixel (0, 0) exactly at frame 0;
        // that one off-color sample must score below the pixel's
        // background samples. With the outlier inside its own fit the
        // Mahalanobis distance is bounded by (n-1)²/n, so the density
        // floor for six frames is exp(-25/12), about 0.12.
        let engine = fitted_engine(FitMethod::Mle);
        let run = engine.tensor().unwrap().pixel_run(0, 0).unwrap();

        assert!(run[0] < 0.3, "outlier density {}", run[0]);
        for (k, &d) in run.iter().enumerate().skip(1) {
            assert!(run[0] < d, "frame {k} scored below the outlier");
        }
    }

    #[test]
    fn test_kde_normalizes_each_pixel_run() {
        let engine = fitted_engine(FitMethod::Kde);
        let tensor = engine.tensor().unwrap();

        // A background pixel untouched by the moving square: its run is
        // max-normalized, so the best-supported frame reads exactly 1.
        let run = tensor.pixel_run(11, 1).unwrap();
        let max = run.iter().cloned().fold(0.0f32, f32::max);
        assert_eq!(max, 1.0);
    }

    #[test]
    fn test_graded_and_binary_select_same_pixels() {
        let engine = fitted_engine(FitMethod::Mle);
        let binary = engine.mask(2, 0.5, MaskMode::Binary).unwrap();
        let graded = engine.mask(2, 0.5, MaskMode::Graded).unwrap();

        for p in 0..binary.data().len() {
            let b = binary.data()[p];
            let g = graded.data()[p];
            assert_eq!(b > 0, g > 0, "selection differs at pixel {p}");
            assert!(g <= b, "graded alpha may not exceed binary");
            if b > 0 {
                // Selected densities are at most 0.5, so graded alpha
                // keeps at least half strength.
                assert!(g >= 127, "graded alpha {g} too weak");
            }
        }
    }

    #[test]
    fn test_spread_contains_plain_mask() {
        let engine = fitted_engine(FitMethod::Mle);
        let plain = engine.mask(0, 0.4, MaskMode::Binary).unwrap();
        let spread = engine.spread_regions(0, 0.4, 0.8).unwrap();

        for p in 0..plain.data().len() {
            if plain.data()[p] > 0 {
                assert!(spread.data()[p] > 0, "seed pixel {p} lost by growth");
            }
        }
    }

    #[test]
    fn test_refit_replaces_tensor() {
        let mut engine = DensityEngine::default();
        engine
            .fit(&SyntheticSource::new(8, 8, 4).frames().unwrap())
            .unwrap();
        assert_eq!(engine.tensor().unwrap().frames(), 4);

        engine
            .fit(&SyntheticSource::new(8, 8, 7).frames().unwrap())
            .unwrap();
        assert_eq!(engine.tensor().unwrap().frames(), 7);
    }
}

//! Video Segmentation Library
//!
//! Foreground segmentation for static-camera image sequences by
//! per-pixel temporal density estimation. Each pixel's history across
//! the sequence is fit with its own small density model; frames are
//! then segmented by flagging the samples their own pixel's model
//! finds improbable.
//!
//! # Architecture
//!
//! The system follows an explicit data flow:
//!
//! ```text
//! sequence → color transform → per-pixel fit → density tensor → masks
//!                                   ↓
//!                          math (Vec3 / Mat3)
//! ```
//!
//! # Design Principles
//!
//! - **Fit once, query often**: The density tensor outlives the frames;
//!   segmenting another frame or threshold never refits
//! - **Degenerate means defined**: Singular covariance yields a constant
//!   density, never NaN
//! - **Unnormalized on purpose**: A sample at its pixel's mean scores
//!   exactly 1, anchoring the fixed thresholds
//! - **Per-pixel independence**: Fitting parallelizes over pixels with
//!   no shared state
//!
//! # Example
//!
//! ```
//! use video_segmentation::{
//!     DensityEngine, EngineConfig, FrameSource, MaskMode, SyntheticSource,
//! };
//!
//! // Generate a small synthetic sequence: static scene, moving square
//! let mut source = SyntheticSource::new(32, 24, 8);
//! let sequence = source.frames().unwrap();
//!
//! // Fit per-pixel density models
//! let mut engine = DensityEngine::new(EngineConfig::default());
//! engine.fit(&sequence).unwrap();
//!
//! // Threshold frame 0 into a foreground mask
//! let mask = engine.mask(0, 0.25, MaskMode::Binary).unwrap();
//! println!(
//!     "{} of {} pixels are foreground",
//!     mask.foreground_count(),
//!     mask.data().len()
//! );
//!
//! // Hysteresis variant: strict seeds grown through a looser threshold
//! let grown = engine.spread_regions(0, 0.25, 0.5).unwrap();
//! assert!(grown.foreground_count() >= mask.foreground_count());
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod color;
pub mod config;
pub mod engine;
pub mod estimate;
pub mod math;
pub mod sequence;

// Re-export commonly used types at crate root
pub use color::ColorSpace;
pub use config::{ConfigError, EngineConfig, JobConfig, SegmentConfig};
pub use engine::{DensityEngine, DensityTensor, EvalError, FitError, Mask, MaskMode};
pub use estimate::{FitMethod, GaussianModel, MixtureComponent, MixtureModel};
pub use math::{Mat3, Vec3};
pub use sequence::{
    Frame, FrameSource, Sequence, SequenceError, SequenceStats, SourceError, SyntheticSource,
};

#[cfg(feature = "image-io")]
pub use sequence::{write_mask, DirectoryLoader};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

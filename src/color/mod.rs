//! Color feature spaces for per-pixel sampling.
//!
//! A density model is only as good as the space it is fit in. RGB mixes
//! illumination into every channel, so the engine converts samples into
//! either YCbCr (separating luma from chroma) or HSL (separating hue
//! from lightness) before fitting.

mod transform;

pub use transform::ColorSpace;

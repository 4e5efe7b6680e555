//! Job configuration.
//!
//! Thresholds are configured on a log scale because that is the scale
//! the densities live on: an unnormalized Gaussian score drops below
//! `exp(-10)` around four and a half standard deviations out, so small
//! integer log thresholds map onto meaningful rarity levels. The
//! linear threshold handed to the engine is always the exponential of
//! the configured value.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::ColorSpace;
use crate::engine::MaskMode;
use crate::estimate::FitMethod;

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown fit method: {0:?} (expected \"mle\" or \"kde\")")]
    UnknownMethod(String),
    #[error("unknown color space: {0:?} (expected \"ycbcr\" or \"hsl\")")]
    UnknownColorSpace(String),
    #[error("unknown mask mode: {0:?} (expected \"binary\" or \"graded\")")]
    UnknownMaskMode(String),
    #[error("log threshold must be finite, got {0}")]
    InvalidThreshold(f32),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Fitting configuration for [`DensityEngine`](crate::DensityEngine).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-pixel estimator to fit with.
    pub method: FitMethod,
    /// Feature space samples are transformed into.
    pub color_space: ColorSpace,
}

/// Segmentation parameters applied after fitting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Frame index to segment.
    pub frame: usize,
    /// Log of the selection threshold.
    pub log_threshold: f32,
    /// Log of the region-growing threshold; enables hysteresis
    /// segmentation when set.
    pub grow_log_threshold: Option<f32>,
    /// How selected pixels render into the mask.
    pub mode: MaskMode,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            frame: 0,
            log_threshold: -10.0,
            grow_log_threshold: None,
            mode: MaskMode::default(),
        }
    }
}

impl SegmentConfig {
    /// Linear selection threshold, `exp(log_threshold)`.
    pub fn threshold(&self) -> f32 {
        self.log_threshold.exp()
    }

    /// Linear region-growing threshold, if hysteresis is enabled.
    pub fn grow_threshold(&self) -> Option<f32> {
        self.grow_log_threshold.map(f32::exp)
    }

    /// Validates the threshold parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.log_threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold(self.log_threshold));
        }
        if let Some(grow) = self.grow_log_threshold {
            if !grow.is_finite() {
                return Err(ConfigError::InvalidThreshold(grow));
            }
        }
        Ok(())
    }
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct JobConfig {
    /// Fitting configuration.
    #[serde(default)]
    pub engine: EngineConfig,
    /// Segmentation configuration.
    #[serde(default)]
    pub segment: SegmentConfig,
}

impl JobConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: JobConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.segment.validate()?;
        Ok(config)
    }
}

impl FromStr for FitMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mle" => Ok(FitMethod::Mle),
            "kde" => Ok(FitMethod::Kde),
            _ => Err(ConfigError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for FitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitMethod::Mle => write!(f, "mle"),
            FitMethod::Kde => write!(f, "kde"),
        }
    }
}

impl FromStr for ColorSpace {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ycbcr" => Ok(ColorSpace::Ycbcr),
            "hsl" => Ok(ColorSpace::Hsl),
            _ => Err(ConfigError::UnknownColorSpace(s.to_string())),
        }
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorSpace::Ycbcr => write!(f, "ycbcr"),
            ColorSpace::Hsl => write!(f, "hsl"),
        }
    }
}

impl FromStr for MaskMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary" => Ok(MaskMode::Binary),
            "graded" => Ok(MaskMode::Graded),
            _ => Err(ConfigError::UnknownMaskMode(s.to_string())),
        }
    }
}

impl fmt::Display for MaskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskMode::Binary => write!(f, "binary"),
            MaskMode::Graded => write!(f, "graded"),
        }
    }
}

//! Engine configuration.

use crate::coords::DEFAULT_RESIZE_TOLERANCE;
use crate::stroke::StrokeStyle;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default eraser hit radius as a fraction of the unit square.
pub const DEFAULT_ERASER_RADIUS: f64 = 0.02;

/// Default minimum rectangle width/height in screen pixels.
pub const DEFAULT_MIN_RECTANGLE_SIZE: f64 = 2.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for one page's ink engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InkConfig {
    /// Style used by the pen and rectangle tools until changed.
    pub pen: StrokeStyle,
    /// Style used by the highlighter until changed.
    pub highlighter: StrokeStyle,
    /// Eraser hit radius in normalized units.
    pub eraser_radius: f64,
    /// Rectangles must exceed this in both screen dimensions to be kept.
    pub min_rectangle_size: f64,
    /// Canvas size change (screen units) below which ink is not rebuilt.
    pub resize_tolerance: f64,
}

impl Default for InkConfig {
    fn default() -> Self {
        Self {
            pen: StrokeStyle::pen(),
            highlighter: StrokeStyle::highlighter(),
            eraser_radius: DEFAULT_ERASER_RADIUS,
            min_rectangle_size: DEFAULT_MIN_RECTANGLE_SIZE,
            resize_tolerance: DEFAULT_RESIZE_TOLERANCE,
        }
    }
}

impl InkConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.eraser_radius.is_finite() && self.eraser_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "eraserRadius must be positive, got {}",
                self.eraser_radius
            )));
        }
        if !(self.min_rectangle_size.is_finite() && self.min_rectangle_size >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "minRectangleSize must be non-negative, got {}",
                self.min_rectangle_size
            )));
        }
        if !(self.resize_tolerance.is_finite() && self.resize_tolerance >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "resizeTolerance must be non-negative, got {}",
                self.resize_tolerance
            )));
        }
        for (name, style) in [("pen", &self.pen), ("highlighter", &self.highlighter)] {
            if !(style.thickness.is_finite() && style.thickness > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} thickness must be positive, got {}",
                    style.thickness
                )));
            }
            if !(0.0..=1.0).contains(&style.opacity) {
                return Err(ConfigError::Invalid(format!(
                    "{name} opacity must be within 0..=1, got {}",
                    style.opacity
                )));
            }
        }
        Ok(())
    }
}

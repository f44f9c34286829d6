//! Editor tuning knobs.

use crate::elements::PATH_HIT_TOLERANCE;
use crate::stroke::CullSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Editor configuration. Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Resize handle hit radius, screen pixels.
    pub handle_tolerance: f64,
    /// Click slop for element hits, screen pixels.
    pub hit_tolerance: f64,
    /// Extra band around path strokes, world units.
    pub path_hit_tolerance: f64,
    /// Eraser radius, screen pixels.
    pub eraser_radius: f64,
    pub laser_max_points: usize,
    pub laser_fade_ms: f64,
    pub eraser_fade_ms: f64,
    /// World offset applied to pasted and duplicated elements.
    pub paste_offset: f64,
    /// Drags smaller than this (world units) do not create a shape.
    pub min_shape_size: f64,
    /// Rubber-band drags smaller than this (screen pixels) count as a click.
    pub min_rubber_band_size: f64,
    pub cull: CullSettings,
    /// Maximum undo depth; `None` keeps every snapshot.
    pub history_limit: Option<usize>,
    /// Longest side of an imported image, world units.
    pub image_max_side: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            handle_tolerance: crate::selection::HANDLE_HIT_TOLERANCE,
            hit_tolerance: 5.0,
            path_hit_tolerance: PATH_HIT_TOLERANCE,
            eraser_radius: 10.0,
            laser_max_points: 50,
            laser_fade_ms: 1000.0,
            eraser_fade_ms: 300.0,
            paste_offset: 20.0,
            min_shape_size: 2.0,
            min_rubber_band_size: 2.0,
            cull: CullSettings::default(),
            history_limit: None,
            image_max_side: 800.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break hit-testing or animation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("handleTolerance", self.handle_tolerance),
            ("hitTolerance", self.hit_tolerance),
            ("eraserRadius", self.eraser_radius),
            ("laserFadeMs", self.laser_fade_ms),
            ("eraserFadeMs", self.eraser_fade_ms),
            ("imageMaxSide", self.image_max_side),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be > 0, got {value}")));
            }
        }
        let non_negative = [
            ("pathHitTolerance", self.path_hit_tolerance),
            ("pasteOffset", self.paste_offset),
            ("minShapeSize", self.min_shape_size),
            ("minRubberBandSize", self.min_rubber_band_size),
            ("cull.paddingPx", self.cull.padding_px),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be >= 0, got {value}")));
            }
        }
        if self.laser_max_points == 0 {
            return Err(ConfigError::Invalid("laserMaxPoints must be at least 1".to_string()));
        }
        if self.cull.min_threshold > self.cull.max_threshold {
            return Err(ConfigError::Invalid(
                "cull.minThreshold must not exceed cull.maxThreshold".to_string(),
            ));
        }
        if self.history_limit == Some(0) {
            return Err(ConfigError::Invalid("historyLimit must be at least 1".to_string()));
        }
        Ok(())
    }
}

//! Tunable constants for the canvas engine.
//!
//! Every zoom bound, buffer and geometry constant lives in [`CanvasConfig`]
//! so the scale invariant is enforced in exactly one place.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error("Config parse error: {0}")]
    Parse(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Engine-wide constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Lowest allowed scale.
    pub min_scale: f64,
    /// Highest allowed scale.
    pub max_scale: f64,
    /// Multiplier applied per wheel notch.
    pub wheel_zoom_factor: f64,
    /// Screen-space margin around the viewport kept rendered (pixels).
    pub virtualization_buffer: f64,
    /// Horizontal control-point offset for curved connections (world units).
    pub curve_handle_length: f64,
    /// Height of a collapsed node (world units).
    pub collapsed_header_height: f64,
    /// Width of the invisible connection hit region (screen pixels).
    pub hit_region_width: f64,
    /// Dash pattern of the flow overlay (world units).
    pub flow_dash: [f64; 2],
    /// Flow overlay speed (world units per second).
    pub flow_speed: f64,
    /// Padding used by fit-to-content (screen pixels).
    pub fit_padding: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.2,
            max_scale: 2.0,
            wheel_zoom_factor: 1.1,
            virtualization_buffer: 1000.0,
            curve_handle_length: 80.0,
            collapsed_header_height: 40.0,
            hit_region_width: 20.0,
            flow_dash: [6.0, 10.0],
            flow_speed: 30.0,
            fit_padding: 50.0,
        }
    }
}

impl CanvasConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the constants are usable.
    pub fn validate(&self) -> ConfigResult<()> {
        let finite = [
            ("min_scale", self.min_scale),
            ("max_scale", self.max_scale),
            ("wheel_zoom_factor", self.wheel_zoom_factor),
            ("virtualization_buffer", self.virtualization_buffer),
            ("curve_handle_length", self.curve_handle_length),
            ("collapsed_header_height", self.collapsed_header_height),
            ("hit_region_width", self.hit_region_width),
            ("flow_speed", self.flow_speed),
            ("fit_padding", self.fit_padding),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite",
                });
            }
        }

        if self.min_scale <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "min_scale",
                reason: "must be positive",
            });
        }
        if self.min_scale > self.max_scale {
            return Err(ConfigError::Invalid {
                field: "max_scale",
                reason: "must not be below min_scale",
            });
        }
        if self.wheel_zoom_factor <= 1.0 {
            return Err(ConfigError::Invalid {
                field: "wheel_zoom_factor",
                reason: "must be greater than 1",
            });
        }

        let non_negative = [
            ("virtualization_buffer", self.virtualization_buffer),
            ("curve_handle_length", self.curve_handle_length),
            ("collapsed_header_height", self.collapsed_header_height),
            ("fit_padding", self.fit_padding),
        ];
        for (field, value) in non_negative {
            if value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be negative",
                });
            }
        }

        if self.hit_region_width <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "hit_region_width",
                reason: "must be positive",
            });
        }
        if self.flow_dash.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(ConfigError::Invalid {
                field: "flow_dash",
                reason: "dash lengths must be finite and non-negative",
            });
        }
        Ok(())
    }

    /// Clamp a candidate scale into `[min_scale, max_scale]`.
    ///
    /// NaN maps to `min_scale`.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            log::warn!("NaN scale clamped to {}", self.min_scale);
            return self.min_scale;
        }
        scale.clamp(self.min_scale, self.max_scale)
    }
}

//! Fight presentation configuration
//!
//! Fixed for the lifetime of a fight; defaults come from `consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Presentation constants consumed by the fight loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FightConfig {
    /// Simulation steps per second
    pub target_fps: f64,
    /// Wait between completion and the "fight ended" notification (ms)
    pub resolution_delay_ms: f64,

    // === Geometry ===
    /// Logical world size (engine units)
    pub world_size: f32,
    /// Drawing surface size (pixels)
    pub surface_size: f32,
    /// Body radius (world units)
    pub body_radius: f32,
    /// Fist radius (world units)
    pub fist_radius: f32,

    // === Effects ===
    /// Lifetime of one hit effect (ms)
    pub hit_effect_ms: f64,
}

impl Default for FightConfig {
    fn default() -> Self {
        Self {
            target_fps: TARGET_FPS,
            resolution_delay_ms: RESOLUTION_DELAY_MS,

            world_size: WORLD_SIZE,
            surface_size: SURFACE_SIZE,
            body_radius: BODY_RADIUS,
            fist_radius: FIST_RADIUS,

            hit_effect_ms: HIT_EFFECT_MS,
        }
    }
}

impl FightConfig {
    /// Interval between scheduled steps (ms)
    pub fn frame_time_ms(&self) -> f64 {
        1000.0 / self.target_fps
    }

    /// Surface pixels per world unit
    pub fn scale(&self) -> f32 {
        self.surface_size / self.world_size
    }

    /// Reject non-positive rates, sizes and radii
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("target_fps", self.target_fps),
            ("world_size", self.world_size as f64),
            ("surface_size", self.surface_size as f64),
            ("body_radius", self.body_radius as f64),
            ("fist_radius", self.fist_radius as f64),
            ("hit_effect_ms", self.hit_effect_ms),
        ];
        for (field, value) in checks {
            // NaN fails this too
            if !(value > 0.0) {
                return Err(ConfigError { field, value });
            }
        }
        if !(self.resolution_delay_ms >= 0.0) {
            return Err(ConfigError {
                field: "resolution_delay_ms",
                value: self.resolution_delay_ms,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FightConfig::default();
        assert!((config.frame_time_ms() - 1000.0 / 48.0).abs() < 1e-9);
        assert!((config.scale() - 1.1).abs() < 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: FightConfig = serde_json::from_str(r#"{"target_fps": 60.0}"#).unwrap();
        assert_eq!(config.target_fps, 60.0);
        assert_eq!(config.resolution_delay_ms, RESOLUTION_DELAY_MS);
    }

    #[test]
    fn test_validate_rejects_zero_rate() {
        let config = FightConfig {
            target_fps: 0.0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "target_fps");

        let config = FightConfig {
            resolution_delay_ms: -1.0,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "resolution_delay_ms");
    }
}

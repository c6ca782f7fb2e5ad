//! Configuration for fixational eye movements.
//!
//! [`EyeMovementConfig`] is read once per tick and never mutated by the
//! simulator. Angles are in degrees and speeds in degrees per second; the
//! simulator converts direction parameters to radians internally.
//!
//! Every interval and speed is drawn from a log-normal distribution, so the
//! means must be strictly positive. Standard deviations may be zero.

use serde::Deserialize;
use validator::Validate;

use crate::error::EyeError;

/// Tunable parameters of the drift and microsaccade processes.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct EyeMovementConfig {
    /// Whether the host should apply fixational movement at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Mean drift speed (degrees/second).
    #[serde(default = "default_drift_mean_speed")]
    #[validate(range(exclusive_min = 0.0))]
    pub drift_mean_speed: f32,

    /// Standard deviation of the drift speed (degrees/second).
    #[serde(default = "default_drift_speed_std_dev")]
    #[validate(range(min = 0.0))]
    pub drift_speed_std_dev: f32,

    /// Maximum per-tick change of the drift direction (degrees).
    #[serde(default = "default_drift_direction_range")]
    #[validate(range(min = 0.0))]
    pub drift_direction_range: f32,

    /// Mean interval between microsaccades (seconds).
    #[serde(default = "default_saccade_mean_interval")]
    #[validate(range(exclusive_min = 0.0))]
    pub saccade_mean_interval: f32,

    /// Standard deviation of the microsaccade interval (seconds).
    #[serde(default = "default_saccade_interval_std_dev")]
    #[validate(range(min = 0.0))]
    pub saccade_interval_std_dev: f32,

    /// Standard deviation of the microsaccade direction around the
    /// fixation point (degrees).
    #[serde(default = "default_saccade_direction_std_dev")]
    #[validate(range(min = 0.0))]
    pub saccade_direction_std_dev: f32,

    /// Mean microsaccade speed (degrees/second).
    #[serde(default = "default_saccade_mean_speed")]
    #[validate(range(exclusive_min = 0.0))]
    pub saccade_mean_speed: f32,

    /// Standard deviation of the microsaccade speed (degrees/second).
    #[serde(default = "default_saccade_speed_std_dev")]
    #[validate(range(min = 0.0))]
    pub saccade_speed_std_dev: f32,

    /// Relative standard deviation of the return distance (overshoot).
    #[serde(default = "default_saccade_overshoot_std_dev")]
    #[validate(range(min = 0.0))]
    pub saccade_overshoot_std_dev: f32,

    /// Largest distance (degrees) a microsaccade may land away from the
    /// fixation point.
    #[serde(default = "default_max_offset_angle")]
    #[validate(range(min = 0.0))]
    pub max_offset_angle: f32,
}

impl Default for EyeMovementConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            drift_mean_speed: default_drift_mean_speed(),
            drift_speed_std_dev: default_drift_speed_std_dev(),
            drift_direction_range: default_drift_direction_range(),
            saccade_mean_interval: default_saccade_mean_interval(),
            saccade_interval_std_dev: default_saccade_interval_std_dev(),
            saccade_direction_std_dev: default_saccade_direction_std_dev(),
            saccade_mean_speed: default_saccade_mean_speed(),
            saccade_speed_std_dev: default_saccade_speed_std_dev(),
            saccade_overshoot_std_dev: default_saccade_overshoot_std_dev(),
            max_offset_angle: default_max_offset_angle(),
        }
    }
}

impl EyeMovementConfig {
    /// Check every field against its permitted range.
    ///
    /// # Errors
    ///
    /// Returns [`EyeError::NonFinite`] for NaN/infinite fields and
    /// [`EyeError::InvalidConfig`] for out-of-range fields.
    pub fn check(&self) -> Result<(), EyeError> {
        let fields = [
            ("drift_mean_speed", self.drift_mean_speed),
            ("drift_speed_std_dev", self.drift_speed_std_dev),
            ("drift_direction_range", self.drift_direction_range),
            ("saccade_mean_interval", self.saccade_mean_interval),
            ("saccade_interval_std_dev", self.saccade_interval_std_dev),
            ("saccade_direction_std_dev", self.saccade_direction_std_dev),
            ("saccade_mean_speed", self.saccade_mean_speed),
            ("saccade_speed_std_dev", self.saccade_speed_std_dev),
            ("saccade_overshoot_std_dev", self.saccade_overshoot_std_dev),
            ("max_offset_angle", self.max_offset_angle),
        ];
        if let Some(&(field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(EyeError::NonFinite { field });
        }
        self.validate()?;
        Ok(())
    }
}

const fn default_true() -> bool {
    true
}

const fn default_drift_mean_speed() -> f32 {
    3.5
}

const fn default_drift_speed_std_dev() -> f32 {
    1.75
}

const fn default_drift_direction_range() -> f32 {
    100.0
}

const fn default_saccade_mean_interval() -> f32 {
    0.8
}

const fn default_saccade_interval_std_dev() -> f32 {
    0.6
}

const fn default_saccade_direction_std_dev() -> f32 {
    40.0
}

const fn default_saccade_mean_speed() -> f32 {
    175.0
}

const fn default_saccade_speed_std_dev() -> f32 {
    50.0
}

const fn default_saccade_overshoot_std_dev() -> f32 {
    0.6
}

const fn default_max_offset_angle() -> f32 {
    0.3
}

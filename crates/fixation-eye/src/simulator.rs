//! Fixational eye movement simulator.
//!
//! Two additive processes run on every tick:
//!
//! - **Drift** -- a slow random walk. The direction turns by a uniform amount
//!   bounded by `drift_direction_range` and the speed is redrawn from a
//!   log-normal distribution each tick.
//! - **Microsaccade** -- a fast corrective jump back toward the fixation point,
//!   planned whenever the countdown expires (or when forced). The jump travels
//!   along the axis of the current offset with some angular deviation, and its
//!   length lands within `max_offset_angle` of the fixation point.
//!
//! The simulator has no failure states: given a valid [`EyeMovementConfig`] it
//! is a pure function of its internal state, elapsed time, and the RNG stream.

use std::f32::consts::TAU;

use fixation_random::{
    clamped_gaussian, log_normal_from_mean_std, mu_clamped_gaussian, uniform_signed,
};
use glam::Vec2;
use rand::Rng;
use tracing::{debug, trace};

use crate::config::EyeMovementConfig;
use crate::error::EyeError;

/// Microsaccade directions are clamped to this many standard deviations.
const SACCADE_DIRECTION_MU: f32 = 3.0;

/// Current drift process state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftState {
    /// Drift direction (radians, in `[0, 2*pi)`).
    pub direction: f32,
    /// Speed drawn for the most recent tick (degrees/second).
    pub speed: f32,
}

/// Current microsaccade process state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaccadeState {
    /// Seconds until the next microsaccade is planned.
    pub time_till_next: f32,
    /// Axis of the active microsaccade (radians). Motion is *against* this axis.
    pub axis: f32,
    /// Speed of the active microsaccade (degrees/second).
    pub speed: f32,
    /// Seconds of motion left in the active microsaccade.
    pub remaining_duration: f32,
}

/// Per-character fixational eye movement state machine.
///
/// Owns the accumulated angular offset (degrees, `x`/`y`) relative to the
/// idle gaze direction. Call [`tick`](Self::tick) once per frame.
#[derive(Debug, Clone)]
pub struct EyeMovementSimulator {
    config: EyeMovementConfig,
    offset: Vec2,
    drift: DriftState,
    saccade: SaccadeState,
}

impl EyeMovementSimulator {
    /// Create a simulator with a zero offset and a random drift direction.
    ///
    /// The saccade countdown starts at zero, so the first tick plans a
    /// microsaccade (of zero length, since the offset is still zero).
    ///
    /// # Errors
    ///
    /// Returns [`EyeError`] if the configuration fails validation.
    pub fn new(config: EyeMovementConfig, rng: &mut impl Rng) -> Result<Self, EyeError> {
        config.check()?;
        Ok(Self {
            config,
            offset: Vec2::ZERO,
            drift: DriftState {
                direction: rng.random_range(0.0..TAU),
                speed: 0.0,
            },
            saccade: SaccadeState {
                time_till_next: 0.0,
                axis: 0.0,
                speed: 0.0,
                remaining_duration: 0.0,
            },
        })
    }

    /// Replace the configuration used from the next tick onward.
    ///
    /// # Errors
    ///
    /// Returns [`EyeError`] and keeps the old configuration if the new one
    /// fails validation.
    pub fn set_config(&mut self, config: EyeMovementConfig) -> Result<(), EyeError> {
        config.check()?;
        self.config = config;
        Ok(())
    }

    /// The active configuration.
    pub const fn config(&self) -> &EyeMovementConfig {
        &self.config
    }

    /// The accumulated angular offset in degrees.
    pub const fn offset(&self) -> Vec2 {
        self.offset
    }

    /// The drift process state.
    pub const fn drift(&self) -> DriftState {
        self.drift
    }

    /// The microsaccade process state.
    pub const fn saccade(&self) -> SaccadeState {
        self.saccade
    }

    /// Whether a microsaccade is currently in motion.
    pub fn is_saccading(&self) -> bool {
        self.saccade.remaining_duration > 0.0
    }

    /// Advance both processes by `delta_time` seconds and return the offset.
    ///
    /// `force_saccade` plans a new microsaccade on this tick regardless of the
    /// countdown, with no overshoot, so the eye recenters tightly. A
    /// `delta_time` of zero moves nothing.
    pub fn tick(&mut self, delta_time: f32, force_saccade: bool, rng: &mut impl Rng) -> Vec2 {
        self.saccade.time_till_next -= delta_time;
        if force_saccade || self.saccade.time_till_next <= 0.0 {
            self.plan_saccade(force_saccade, rng);
        }
        self.advance_saccade(delta_time);
        self.advance_drift(delta_time, rng);
        self.offset
    }

    /// Plan the upcoming microsaccade from the current offset.
    fn plan_saccade(&mut self, forced: bool, rng: &mut impl Rng) {
        let config = &self.config;
        let magnitude = self.offset.length();

        // The axis points away from the fixation point; motion is subtracted.
        let deviation = mu_clamped_gaussian(
            0.0,
            config.saccade_direction_std_dev.to_radians(),
            SACCADE_DIRECTION_MU,
            rng,
        );
        let axis = self.offset.y.atan2(self.offset.x) + deviation;

        let speed =
            log_normal_from_mean_std(config.saccade_mean_speed, config.saccade_speed_std_dev, rng);

        let overshoot_factor = if forced { 0.0 } else { 1.0 };
        let return_distance = clamped_gaussian(
            magnitude,
            config.saccade_overshoot_std_dev * overshoot_factor * magnitude,
            magnitude - config.max_offset_angle,
            magnitude + config.max_offset_angle,
            rng,
        )
        .max(0.0);

        let interval = log_normal_from_mean_std(
            config.saccade_mean_interval,
            config.saccade_interval_std_dev,
            rng,
        );

        self.saccade = SaccadeState {
            time_till_next: interval,
            axis,
            speed,
            remaining_duration: return_distance / speed,
        };

        debug!(
            forced,
            distance = return_distance,
            axis_deg = axis.to_degrees(),
            next_in = interval,
            "Microsaccade planned"
        );
    }

    /// Move along the active microsaccade, if any.
    ///
    /// The tick that exhausts the saccade moves only the remaining duration
    /// and leaves `remaining_duration` at exactly zero.
    fn advance_saccade(&mut self, delta_time: f32) {
        if self.saccade.remaining_duration <= 0.0 {
            return;
        }
        let step = delta_time.min(self.saccade.remaining_duration);
        self.offset -= Vec2::from_angle(self.saccade.axis) * (step * self.saccade.speed);
        self.saccade.remaining_duration -= step;
        if self.saccade.remaining_duration < 0.0 {
            self.saccade.remaining_duration = 0.0;
        }
    }

    /// Perturb the drift direction, redraw its speed, and apply it.
    fn advance_drift(&mut self, delta_time: f32, rng: &mut impl Rng) {
        let config = &self.config;
        let turn = uniform_signed(rng) * config.drift_direction_range.to_radians();
        self.drift.direction = (self.drift.direction + turn).rem_euclid(TAU);
        self.drift.speed =
            log_normal_from_mean_std(config.drift_mean_speed, config.drift_speed_std_dev, rng);
        self.offset += Vec2::from_angle(self.drift.direction) * (self.drift.speed * delta_time);

        trace!(
            speed = self.drift.speed,
            direction_deg = self.drift.direction.to_degrees(),
            "Drift step"
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

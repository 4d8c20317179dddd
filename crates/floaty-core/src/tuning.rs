//! Tuning constants for particle motion and frame timing.

use serde::{Deserialize, Serialize};

use crate::attribute::ConfigError;

/// Motion and timing parameters shared by every particle of a controller.
///
/// The defaults are the values the animation has always been tuned with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Velocity gained per step toward the destination.
    pub acceleration: f64,
    /// Damping factor applied when a particle runs faster than `max_speed`.
    pub deceleration: f64,
    /// Speed above which damping kicks in.
    pub max_speed: f64,
    /// A destination closer than this is replaced with a fresh one.
    pub proximity: f64,
    /// Side length of the rendered square, in pixels.
    pub particle_size: f64,
    /// Initial velocity components are sampled from `[-v, v)`.
    pub initial_velocity: f64,
    /// Nominal frame period in milliseconds (60 Hz).
    pub frame_period_ms: f64,
    /// Lower bound for `dt`.
    pub min_dt: f64,
    /// Upper bound for `dt`.
    pub max_dt: f64,
    /// Alpha of the destination-in fade. `1.0` keeps trails forever.
    pub fade_alpha: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            acceleration: 0.1,
            deceleration: 0.92,
            max_speed: 1.0,
            proximity: 40.0,
            particle_size: 3.0,
            initial_velocity: 0.4,
            frame_period_ms: 1000.0 / 60.0,
            min_dt: 0.001,
            max_dt: 10.0,
            fade_alpha: 0.85,
        }
    }
}

impl Tuning {
    /// Check that every value is finite and inside its meaningful range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("acceleration must be finite", self.acceleration),
            ("deceleration must be finite", self.deceleration),
            ("max_speed must be finite", self.max_speed),
            ("proximity must be finite", self.proximity),
            ("particle_size must be finite", self.particle_size),
            ("initial_velocity must be finite", self.initial_velocity),
            ("frame_period_ms must be finite", self.frame_period_ms),
            ("min_dt must be finite", self.min_dt),
            ("max_dt must be finite", self.max_dt),
            ("fade_alpha must be finite", f64::from(self.fade_alpha)),
        ];
        if let Some(&(msg, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::InvalidTuning(msg));
        }
        if !(0.0..1.0).contains(&self.deceleration) {
            return Err(ConfigError::InvalidTuning("deceleration must be in [0, 1)"));
        }
        if self.max_speed <= 0.0 || self.frame_period_ms <= 0.0 || self.particle_size <= 0.0 {
            return Err(ConfigError::InvalidTuning(
                "max_speed, frame_period_ms and particle_size must be > 0",
            ));
        }
        if self.min_dt <= 0.0 || self.min_dt > self.max_dt {
            return Err(ConfigError::InvalidTuning("dt bounds must satisfy 0 < min_dt <= max_dt"));
        }
        if !(0.0..=1.0).contains(&self.fade_alpha) {
            return Err(ConfigError::InvalidTuning("fade_alpha must be in [0, 1]"));
        }
        Ok(())
    }
}

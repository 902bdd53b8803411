use std::time::Duration;

use serde::Deserialize;

/// Classification thresholds, fixed at startup.
///
/// One immutable value constructed once and passed to each classifier;
/// nothing in the engine mutates tuning after construction.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputTuning {
    /// Pointer travel (px) at or below which a release is a tap.
    pub inactive_radius: f64,
    /// Scale applied to pinch separation deltas (px -> zoom units).
    pub pinch_sensitivity: f64,
    /// Scale applied to wheel deltas.
    pub wheel_sensitivity: f64,
    /// Scale applied to wheel deltas when the trackpad-pinch modifier is set.
    pub trackpad_sensitivity: f64,
    /// User-facing zoom multiplier, applied on top of either sensitivity.
    pub user_zoom_sensitivity: f64,
    /// Acceleration magnitude (m/s^2, gravity excluded) that arms the
    /// shake detector.
    pub impulse_threshold: f64,
    /// Acceleration magnitude required to confirm a shake.
    pub shake_threshold: f64,
    /// Component along the armed axis required to confirm a shake.
    pub direction_threshold: f64,
    /// How long an armed impulse may wait for confirmation (ms).
    pub impulse_max_duration_ms: u64,
    /// Cool-down after a confirmed shake (ms).
    pub shake_debounce_ms: u64,
    /// Minimum spacing between tilt emissions (ms).
    pub tilt_min_interval_ms: u64,
    /// Tilt change (degrees) on either axis required to emit again.
    pub tilt_emit_delta: f64,
}

impl Default for InputTuning {
    fn default() -> Self {
        Self {
            inactive_radius: 16.0,
            pinch_sensitivity: 0.0025,
            wheel_sensitivity: 0.001,
            trackpad_sensitivity: 0.005,
            user_zoom_sensitivity: 1.0,
            impulse_threshold: 5.0,
            shake_threshold: 15.0,
            direction_threshold: 10.0,
            impulse_max_duration_ms: 300,
            shake_debounce_ms: 1000,
            tilt_min_interval_ms: 100,
            tilt_emit_delta: 1.0,
        }
    }
}

impl InputTuning {
    pub fn impulse_max_duration(&self) -> Duration {
        Duration::from_millis(self.impulse_max_duration_ms)
    }

    pub fn shake_debounce(&self) -> Duration {
        Duration::from_millis(self.shake_debounce_ms)
    }

    pub fn tilt_min_interval(&self) -> Duration {
        Duration::from_millis(self.tilt_min_interval_ms)
    }
}

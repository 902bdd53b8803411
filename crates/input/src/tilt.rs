//! Continuous tilt control relative to a calibrated neutral pose.

use std::time::Instant;

use tracing::debug;

use crate::config::InputTuning;
use crate::sensors::Orientation;

/// One rate-limited tilt update. `transmitting == false` only on the forced
/// final emission produced by [`TiltGenerator::disable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltEmission {
    pub tilt_x: f64,
    pub tilt_z: f64,
    pub transmitting: bool,
}

/// Turns orientation samples into rate-limited tilt deltas.
///
/// Enabling captures the neutral pose (immediately when an orientation is at
/// hand, otherwise from the next sample). Emission requires the minimum
/// interval to have elapsed AND either axis to have moved past the delta
/// gate since the last emission; a change of the transmitting flag
/// satisfies the second gate on its own.
#[derive(Debug)]
pub struct TiltGenerator {
    tuning: InputTuning,
    neutral: Option<Orientation>,
    transmitting: bool,
    flag_changed: bool,
    last_emit: Option<Instant>,
    last_emitted_x: f64,
    last_emitted_z: f64,
}

impl TiltGenerator {
    pub fn new(tuning: InputTuning) -> Self {
        Self {
            tuning,
            neutral: None,
            transmitting: false,
            flag_changed: false,
            last_emit: None,
            last_emitted_x: 0.0,
            last_emitted_z: 0.0,
        }
    }

    pub fn is_transmitting(&self) -> bool {
        self.transmitting
    }

    pub fn neutral(&self) -> Option<Orientation> {
        self.neutral
    }

    /// Begin transmitting. `current` calibrates the neutral pose now; pass
    /// `None` to calibrate lazily from the next sample.
    pub fn enable(&mut self, current: Option<Orientation>) {
        if !self.transmitting {
            self.flag_changed = true;
        }
        self.transmitting = true;
        self.neutral = current;
        self.last_emit = None;
        self.last_emitted_x = 0.0;
        self.last_emitted_z = 0.0;
        debug!(calibrated = self.neutral.is_some(), "tilt enabled");
    }

    /// Stop transmitting. Clears calibration synchronously and returns the
    /// forced final emission with zeroed tilt and the disabled flag.
    pub fn disable(&mut self) -> TiltEmission {
        self.transmitting = false;
        self.neutral = None;
        self.flag_changed = false;
        self.last_emit = None;
        self.last_emitted_x = 0.0;
        self.last_emitted_z = 0.0;
        debug!("tilt disabled");
        TiltEmission {
            tilt_x: 0.0,
            tilt_z: 0.0,
            transmitting: false,
        }
    }

    /// Feed one orientation sample. O(1), infallible; returns an emission
    /// only when both gates pass.
    pub fn ingest(&mut self, orientation: Orientation, now: Instant) -> Option<TiltEmission> {
        if !self.transmitting {
            return None;
        }
        let neutral = match self.neutral {
            Some(neutral) => neutral,
            None => {
                self.neutral = Some(orientation);
                orientation
            }
        };
        let tilt_x = (orientation.beta - neutral.beta).clamp(-90.0, 90.0);
        let tilt_z = (orientation.gamma - neutral.gamma).clamp(-90.0, 90.0);

        if let Some(last) = self.last_emit {
            if now.duration_since(last) < self.tuning.tilt_min_interval() {
                return None;
            }
        }
        let moved = (tilt_x - self.last_emitted_x).abs() > self.tuning.tilt_emit_delta
            || (tilt_z - self.last_emitted_z).abs() > self.tuning.tilt_emit_delta;
        if !moved && !self.flag_changed {
            return None;
        }

        self.flag_changed = false;
        self.last_emit = Some(now);
        self.last_emitted_x = tilt_x;
        self.last_emitted_z = tilt_z;
        Some(TiltEmission {
            tilt_x,
            tilt_z,
            transmitting: true,
        })
    }
}

#[cfg(test)]
#[path = "tests/tilt_tests.rs"]
mod tests;

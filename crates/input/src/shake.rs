//! Directional shake detection: a two-bar impulse/confirm state machine over
//! gravity-excluded acceleration samples.

use std::time::Instant;

use tracing::debug;

use crate::config::InputTuning;
use crate::sensors::Vec3;

/// Direction of a confirmed shake, mapped from the dominant device axis:
/// x is east/west, y is up/down, z is north/south, positive sign first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShakeDirection {
    East,
    West,
    North,
    South,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn component(self, v: Vec3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    fn dominant(v: Vec3) -> (Axis, bool) {
        let (ax, ay, az) = (v.x.abs(), v.y.abs(), v.z.abs());
        if ax >= ay && ax >= az {
            (Axis::X, v.x >= 0.0)
        } else if ay >= az {
            (Axis::Y, v.y >= 0.0)
        } else {
            (Axis::Z, v.z >= 0.0)
        }
    }

    fn direction(self, positive: bool) -> ShakeDirection {
        match (self, positive) {
            (Axis::X, true) => ShakeDirection::East,
            (Axis::X, false) => ShakeDirection::West,
            (Axis::Y, true) => ShakeDirection::Up,
            (Axis::Y, false) => ShakeDirection::Down,
            (Axis::Z, true) => ShakeDirection::North,
            (Axis::Z, false) => ShakeDirection::South,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    ImpulseDetected {
        axis: Axis,
        positive: bool,
        started: Instant,
    },
}

/// Impulse/confirm shake detector.
///
/// A sample above `impulse_threshold` arms the detector and records the
/// dominant axis and its sign. Confirmation requires, within
/// `impulse_max_duration`, a sample above `shake_threshold` whose component
/// along the armed axis (in the armed sign) exceeds `direction_threshold`.
/// Exactly one event fires per confirmation, followed by a debounce window
/// during which the detector will not re-arm.
#[derive(Debug)]
pub struct ShakeDetector {
    tuning: InputTuning,
    phase: Phase,
    last_shake: Option<Instant>,
}

impl ShakeDetector {
    pub fn new(tuning: InputTuning) -> Self {
        Self {
            tuning,
            phase: Phase::Idle,
            last_shake: None,
        }
    }

    /// Feed one gravity-excluded acceleration sample. O(1); never blocks,
    /// never fails.
    pub fn ingest(&mut self, accel: Vec3, now: Instant) -> Option<ShakeDirection> {
        let magnitude = accel.magnitude();
        match self.phase {
            Phase::Idle => {
                if let Some(last) = self.last_shake {
                    if now.duration_since(last) < self.tuning.shake_debounce() {
                        return None;
                    }
                }
                if magnitude > self.tuning.impulse_threshold {
                    let (axis, positive) = Axis::dominant(accel);
                    self.phase = Phase::ImpulseDetected {
                        axis,
                        positive,
                        started: now,
                    };
                }
                None
            }
            Phase::ImpulseDetected {
                axis,
                positive,
                started,
            } => {
                if now.duration_since(started) > self.tuning.impulse_max_duration() {
                    self.phase = Phase::Idle;
                    return None;
                }
                let along_axis = if positive {
                    axis.component(accel)
                } else {
                    -axis.component(accel)
                };
                if magnitude > self.tuning.shake_threshold
                    && along_axis > self.tuning.direction_threshold
                {
                    self.phase = Phase::Idle;
                    self.last_shake = Some(now);
                    let direction = axis.direction(positive);
                    debug!(?direction, magnitude, "shake confirmed");
                    return Some(direction);
                }
                None
            }
        }
    }

    /// Synchronous cancellation: drops any armed impulse and the debounce
    /// history before returning.
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.last_shake = None;
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.phase, Phase::ImpulseDetected { .. })
    }
}

#[cfg(test)]
#[path = "tests/shake_tests.rs"]
mod tests;

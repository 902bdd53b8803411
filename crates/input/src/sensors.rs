//! Raw motion-sensor sample types and the diagnostic snapshot.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn magnitude(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Device orientation in degrees: `alpha` around z, `beta` around x,
/// `gamma` around y.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Orientation {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { alpha, beta, gamma }
    }
}

/// One sensor callback's worth of motion data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionSample {
    /// Gravity-excluded acceleration.
    pub accel: Vec3,
    pub accel_with_gravity: Vec3,
    pub orientation: Orientation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorStatus {
    /// No capability probe has completed yet.
    #[default]
    Unknown,
    Available,
    Unavailable,
    Denied,
}

impl SensorStatus {
    pub fn is_usable(self) -> bool {
        matches!(self, SensorStatus::Available)
    }
}

/// Last-seen sensor values, retained unconditionally for read-back.
///
/// Updated on every callback before any classifier runs, so diagnostics
/// reflect the raw stream even while detection is disabled or debouncing.
#[derive(Debug, Clone, Default)]
pub struct MotionSnapshot {
    pub last_accel: Option<Vec3>,
    pub last_accel_with_gravity: Option<Vec3>,
    pub last_orientation: Option<Orientation>,
    pub accelerometer: SensorStatus,
    pub orientation_sensor: SensorStatus,
}

impl MotionSnapshot {
    pub fn record_acceleration(&mut self, accel: Vec3, accel_with_gravity: Vec3) {
        self.last_accel = Some(accel);
        self.last_accel_with_gravity = Some(accel_with_gravity);
    }

    pub fn record_orientation(&mut self, orientation: Orientation) {
        self.last_orientation = Some(orientation);
    }
}

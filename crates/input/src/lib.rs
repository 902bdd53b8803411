//! Input classification for controller clients.
//!
//! Everything in this crate is a synchronous state machine driven from the
//! callback that owns the raw event: pointer contacts, acceleration samples,
//! orientation samples. No timers, no threads; time arrives as an explicit
//! [`std::time::Instant`] with each sample.

pub mod config;
pub mod gesture;
pub mod pointer;
pub mod sensors;
pub mod shake;
pub mod tilt;

pub use config::InputTuning;
pub use gesture::{Gesture, GestureEngine};
pub use pointer::{ContactTracker, Point};
pub use sensors::{MotionSnapshot, Orientation, SensorStatus, Vec3};
pub use shake::{ShakeDetector, ShakeDirection};
pub use tilt::{TiltEmission, TiltGenerator};

//! Pointer gesture classification: tap, four-way swipe, continuous zoom.

use tracing::trace;

use crate::config::InputTuning;
use crate::pointer::{ContactTracker, Point};

/// Discrete outcome of a completed single-contact gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Tap,
    North,
    South,
    East,
    West,
}

/// Classify a completed single-contact gesture from its start and end
/// positions.
///
/// Travel within `inactive_radius` is a tap. Beyond it the dominant axis
/// wins, the sign picks the direction. When `|dx| == |dy|` the vertical
/// branch is taken; that tie-break is long-standing observable behavior and
/// is kept as-is.
pub fn classify_release(start: Point, end: Point, tuning: &InputTuning) -> Gesture {
    if start.distance_to(end) <= tuning.inactive_radius {
        return Gesture::Tap;
    }
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            Gesture::East
        } else {
            Gesture::West
        }
    } else if dy > 0.0 {
        Gesture::South
    } else {
        Gesture::North
    }
}

/// Owns the contact cache and turns raw pointer callbacks into gestures and
/// zoom deltas. One instance per controller surface.
#[derive(Debug)]
pub struct GestureEngine {
    tuning: InputTuning,
    tracker: ContactTracker,
}

impl GestureEngine {
    pub fn new(tuning: InputTuning) -> Self {
        Self {
            tuning,
            tracker: ContactTracker::new(),
        }
    }

    pub fn active_contacts(&self) -> usize {
        self.tracker.active_contacts()
    }

    pub fn pointer_down(&mut self, pointer_id: i64, position: Point) {
        self.tracker.contact_started(pointer_id, position);
    }

    /// Feed a pointer move. While exactly two contacts are active every move
    /// yields a zoom delta against the previous separation; shrinking
    /// separation zooms in, hence the sign flip.
    pub fn pointer_moved(&mut self, pointer_id: i64, position: Point) -> Option<f64> {
        self.tracker.contact_moved(pointer_id, position);
        if self.tracker.active_contacts() != 2 {
            return None;
        }
        let prev = self.tracker.pinch_separation()?;
        let cur = self.tracker.current_separation();
        self.tracker.replace_pinch_separation(cur);
        let delta =
            (cur - prev) * self.tuning.pinch_sensitivity * self.tuning.user_zoom_sensitivity * -1.0;
        trace!(delta, "pinch zoom");
        Some(delta)
    }

    /// Feed a pointer release. Classification only fires for the release of
    /// the sole active contact; releases that end a pinch produce nothing.
    pub fn pointer_up(&mut self, pointer_id: i64, position: Point) -> Option<Gesture> {
        self.tracker.contact_moved(pointer_id, position);
        let was_single = self.tracker.active_contacts() == 1;
        let start = self.tracker.gesture_start();
        let end = self.tracker.contact_ended(pointer_id)?;
        if !was_single {
            return None;
        }
        let gesture = classify_release(start?, end, &self.tuning);
        trace!(?gesture, "pointer release");
        Some(gesture)
    }

    /// Cancelled contacts are removed without classification.
    pub fn pointer_cancelled(&mut self, pointer_id: i64) {
        self.tracker.contact_ended(pointer_id);
    }

    /// Wheel / trackpad zoom. The trackpad-pinch modifier selects a larger
    /// sensitivity constant.
    pub fn wheel(&self, wheel_delta_y: f64, trackpad_pinch: bool) -> f64 {
        let sensitivity = if trackpad_pinch {
            self.tuning.trackpad_sensitivity
        } else {
            self.tuning.wheel_sensitivity
        };
        wheel_delta_y * sensitivity * self.tuning.user_zoom_sensitivity
    }
}

#[cfg(test)]
#[path = "tests/gesture_tests.rs"]
mod tests;

use super::*;

use std::time::Duration;

fn detector() -> ShakeDetector {
    ShakeDetector::new(InputTuning::default())
}

fn t0() -> Instant {
    Instant::now()
}

#[test]
fn impulse_then_strong_directional_sample_confirms_once() {
    let mut d = detector();
    let start = t0();
    assert_eq!(d.ingest(Vec3::new(6.0, 0.0, 0.0), start), None);
    assert!(d.is_armed());
    let confirmed = d.ingest(
        Vec3::new(16.0, 1.0, 1.0),
        start + Duration::from_millis(50),
    );
    assert_eq!(confirmed, Some(ShakeDirection::East));
    assert!(!d.is_armed());
}

#[test]
fn negative_axis_maps_to_opposite_direction() {
    let mut d = detector();
    let start = t0();
    d.ingest(Vec3::new(-6.0, 0.0, 0.0), start);
    let confirmed = d.ingest(
        Vec3::new(-16.0, 0.0, 0.0),
        start + Duration::from_millis(50),
    );
    assert_eq!(confirmed, Some(ShakeDirection::West));
}

#[test]
fn vertical_and_depth_axes_map_to_their_directions() {
    let start = t0();

    let mut d = detector();
    d.ingest(Vec3::new(0.0, 7.0, 0.0), start);
    assert_eq!(
        d.ingest(Vec3::new(0.0, 17.0, 0.0), start + Duration::from_millis(40)),
        Some(ShakeDirection::Up)
    );

    let mut d = detector();
    d.ingest(Vec3::new(0.0, 0.0, -7.0), start);
    assert_eq!(
        d.ingest(Vec3::new(0.0, 0.0, -17.0), start + Duration::from_millis(40)),
        Some(ShakeDirection::South)
    );
}

#[test]
fn weak_confirmation_keeps_waiting_within_window() {
    let mut d = detector();
    let start = t0();
    d.ingest(Vec3::new(6.0, 0.0, 0.0), start);
    // Over the magnitude bar but not along the armed axis.
    assert_eq!(
        d.ingest(
            Vec3::new(2.0, 16.0, 0.0),
            start + Duration::from_millis(50)
        ),
        None
    );
    assert!(d.is_armed());
    // A proper sample inside the window still confirms.
    assert_eq!(
        d.ingest(
            Vec3::new(16.0, 0.0, 0.0),
            start + Duration::from_millis(100)
        ),
        Some(ShakeDirection::East)
    );
}

#[test]
fn impulse_times_out_without_confirmation() {
    let mut d = detector();
    let tuning = InputTuning::default();
    let start = t0();
    d.ingest(Vec3::new(6.0, 0.0, 0.0), start);
    let late = start + tuning.impulse_max_duration() + Duration::from_millis(1);
    // Past the window the armed impulse is discarded; even a strong sample
    // produces no event on this step.
    assert_eq!(d.ingest(Vec3::new(16.0, 0.0, 0.0), late), None);
    assert!(!d.is_armed());
}

#[test]
fn debounce_suppresses_rearming_after_confirm() {
    let mut d = detector();
    let tuning = InputTuning::default();
    let start = t0();
    d.ingest(Vec3::new(6.0, 0.0, 0.0), start);
    d.ingest(Vec3::new(16.0, 0.0, 0.0), start + Duration::from_millis(20))
        .expect("confirmed");

    // Inside the cool-down nothing arms, whatever the magnitude.
    let during = start + Duration::from_millis(20) + tuning.shake_debounce() / 2;
    assert_eq!(d.ingest(Vec3::new(30.0, 0.0, 0.0), during), None);
    assert!(!d.is_armed());

    // After the cool-down the machine runs again.
    let after = start + Duration::from_millis(20) + tuning.shake_debounce()
        + Duration::from_millis(1);
    assert_eq!(d.ingest(Vec3::new(6.0, 0.0, 0.0), after), None);
    assert!(d.is_armed());
    assert_eq!(
        d.ingest(
            Vec3::new(16.0, 0.0, 0.0),
            after + Duration::from_millis(20)
        ),
        Some(ShakeDirection::East)
    );
}

#[test]
fn reset_clears_armed_state_and_debounce() {
    let mut d = detector();
    let start = t0();
    d.ingest(Vec3::new(6.0, 0.0, 0.0), start);
    d.ingest(Vec3::new(16.0, 0.0, 0.0), start + Duration::from_millis(20))
        .expect("confirmed");
    d.reset();
    // No cool-down survives a reset.
    d.ingest(Vec3::new(6.0, 0.0, 0.0), start + Duration::from_millis(40));
    assert!(d.is_armed());
}

//! Tests for pointer throwing through the public API

use bevy::prelude::*;
use pointer_throw::throwable::{
    velocity_change, DragHit, ThrowEffect, ThrowFrames, ThrowSettings, Throwable,
    MAX_THROW_FRAMES,
};

fn hit_at(position: Vec3) -> Option<DragHit> {
    Some(DragHit::new(position, Vec3::Y))
}

#[test]
fn test_five_frames_keep_last_four() {
    let mut frames = ThrowFrames::new();
    for i in 0..5 {
        frames.record(Vec3::new(i as f32, 0.0, 0.0), i as f32 * 0.1);
    }

    assert_eq!(frames.len(), MAX_THROW_FRAMES);
    assert_eq!(frames.first().map(|f| f.position.x), Some(1.0));
    assert_eq!(frames.last().map(|f| f.position.x), Some(4.0));
}

#[test]
fn test_throw_uses_recent_window_only() {
    let mut throwable = Throwable::new().with_bounding_radius(0.25);

    throwable.pointer_down();
    // Slow start that ages out of the window.
    throwable.begin_drag(hit_at(Vec3::ZERO), 0.0);
    throwable.drag(hit_at(Vec3::new(0.1, 0.0, 0.0)), 1.0);
    // Fast, steady motion at the end.
    for i in 0..3 {
        let t = 1.1 + i as f32 * 0.1;
        throwable.drag(hit_at(Vec3::new(1.0 + i as f32, 0.0, 0.0)), t);
    }
    throwable.pointer_up();
    let effects = throwable.end_drag(hit_at(Vec3::new(4.0, 0.0, 0.0)), 1.4);

    let velocity = velocity_change(&effects).expect("throw should produce a velocity");
    assert!((velocity - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-3);
    assert!(!throwable.is_pointer_controlled());
    assert!(throwable.frames().is_empty());
}

#[test]
fn test_drag_off_surface_keeps_mode_without_frames() {
    let mut throwable = Throwable::new();

    throwable.pointer_down();
    let effects = throwable.begin_drag(None, 0.0);
    assert_eq!(effects, vec![ThrowEffect::SetPointerControlled(true)]);
    let effects = throwable.drag(None, 0.1);
    assert_eq!(effects, vec![ThrowEffect::SetPointerControlled(true)]);

    let effects = throwable.end_drag(None, 0.2);
    assert_eq!(effects, vec![ThrowEffect::SetPointerControlled(false)]);
}

#[test]
fn test_settings_limit_is_applied() {
    let settings = ThrowSettings::from_json(r#"{ "max_force": 2.0 }"#).unwrap();
    let mut throwable = Throwable::new().with_max_force(settings.force_limit());

    throwable.begin_drag(hit_at(Vec3::ZERO), 0.0);
    let effects = throwable.end_drag(hit_at(Vec3::new(0.0, 0.0, -8.0)), 1.0);

    let velocity = velocity_change(&effects).unwrap();
    assert!((velocity.length() - 2.0).abs() < 1e-5);
    assert!(velocity.z < 0.0);
}

#[test]
fn test_next_gesture_starts_fresh() {
    let mut throwable = Throwable::new();

    throwable.begin_drag(hit_at(Vec3::ZERO), 0.0);
    throwable.end_drag(hit_at(Vec3::X), 1.0);

    // A single frame in the following gesture is not enough to throw.
    let effects = throwable.end_drag(hit_at(Vec3::new(5.0, 0.0, 0.0)), 2.0);
    assert_eq!(velocity_change(&effects), None);
}

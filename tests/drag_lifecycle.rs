//! End-to-end drag lifecycle over a scripted sensor.
//!
//! Covers the gesture state machine transitions: pan-begin tracking,
//! threshold gating, tracking-point seeding from the object's projection,
//! per-frame re-resolution, and the exactly-once anchor commit on pan end.

use std::sync::Arc;

use arplace_core::{Alignment, AnchorId, SurfaceAnchor};
use arplace_interaction::{ObjectId, Session, SessionEvent};
use arplace_testkit::{
    anchored_hit, estimated_horizontal_hit, pan_began, pan_changed, pan_ended, ScriptedSensor,
};
use glam::{Mat4, Vec2, Vec3};

fn floor_anchor() -> SurfaceAnchor {
    SurfaceAnchor::new(
        AnchorId(1),
        Alignment::Horizontal,
        Vec3::ZERO,
        Vec2::new(4.0, 4.0),
        Mat4::IDENTITY,
    )
}

/// Session with one object placed at the world origin via an anchored hit,
/// pickable within 50 px of screen origin.
fn session_with_object() -> (Arc<ScriptedSensor>, Session<ScriptedSensor>, ObjectId) {
    let sensor = Arc::new(ScriptedSensor::new());
    sensor.set_default_hit(Some(anchored_hit(floor_anchor(), Vec3::ZERO)));

    let mut session = Session::new(Arc::clone(&sensor), Vec2::ZERO);
    session.handle_event(SessionEvent::SurfaceAdded(floor_anchor()));

    let object = session.primary_object().expect("object created");
    let node = session.primary_node().expect("object has a node");
    sensor.add_pick_region(Vec2::ZERO, 50.0, node);
    (sensor, session, object)
}

#[test]
fn pan_begin_over_object_starts_tracking() {
    let (_sensor, mut session, object) = session_with_object();

    session.handle_event(SessionEvent::Gesture(pan_began(vec![Vec2::new(5.0, 5.0)])));

    assert_eq!(session.controller().tracked_object(), Some(object));
    assert_eq!(session.controller().tracking_point(), None);
}

#[test]
fn pan_begin_off_object_tracks_nothing() {
    let (_sensor, mut session, _object) = session_with_object();

    session.handle_event(SessionEvent::Gesture(pan_began(vec![Vec2::new(
        500.0, 500.0,
    )])));

    assert_eq!(session.controller().tracked_object(), None);
}

#[test]
fn below_threshold_changes_are_ignored() {
    let (_sensor, mut session, _object) = session_with_object();

    session.handle_event(SessionEvent::Gesture(pan_began(vec![Vec2::ZERO])));
    session.handle_event(SessionEvent::Gesture(pan_changed(
        Vec2::new(3.0, 1.0),
        false,
    )));

    assert_eq!(session.controller().tracking_point(), None);
}

#[test]
fn threshold_exceeded_seeds_tracking_point_from_projection() {
    let (_sensor, mut session, _object) = session_with_object();

    session.handle_event(SessionEvent::Gesture(pan_began(vec![Vec2::ZERO])));
    session.handle_event(SessionEvent::Gesture(pan_changed(
        Vec2::new(30.0, 10.0),
        true,
    )));

    // Object sits at world origin, which projects to screen origin; the
    // tracking point is that projection plus the incremental translation.
    assert_eq!(
        session.controller().tracking_point(),
        Some(Vec2::new(30.0, 10.0))
    );

    // Further deltas accumulate onto the tracking point.
    session.handle_event(SessionEvent::Gesture(pan_changed(
        Vec2::new(10.0, 0.0),
        true,
    )));
    assert_eq!(
        session.controller().tracking_point(),
        Some(Vec2::new(40.0, 10.0))
    );
}

#[test]
fn frame_ticks_resolve_the_tracking_point() {
    let (sensor, mut session, object) = session_with_object();

    session.handle_event(SessionEvent::Gesture(pan_began(vec![Vec2::ZERO])));
    session.handle_event(SessionEvent::Gesture(pan_changed(
        Vec2::new(50.0, 0.0),
        true,
    )));

    sensor.queue_hit(Some(anchored_hit(
        floor_anchor(),
        Vec3::new(0.5, 0.0, 0.0),
    )));
    session.handle_event(SessionEvent::FrameTick);

    let position = session.scene().object(object).unwrap().position();
    assert!((position - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-5);

    // The drag resolution honors the infinite-plane developer setting.
    let calls = sensor.hit_test_calls();
    let last = calls.last().unwrap();
    assert!(last.infinite_plane);
    assert_eq!(last.point, Vec2::new(50.0, 0.0));
    assert_eq!(last.allowed, vec![Alignment::Horizontal]);
}

#[test]
fn anchored_hits_apply_exactly_estimated_hits_smooth() {
    let (sensor, mut session, object) = session_with_object();

    session.handle_event(SessionEvent::Gesture(pan_began(vec![Vec2::ZERO])));
    session.handle_event(SessionEvent::Gesture(pan_changed(
        Vec2::new(50.0, 0.0),
        true,
    )));

    // Anchored hit: applied exactly, no distance sample recorded.
    sensor.queue_hit(Some(anchored_hit(
        floor_anchor(),
        Vec3::new(1.0, 0.0, 0.0),
    )));
    session.handle_event(SessionEvent::FrameTick);
    assert!(session
        .scene()
        .object(object)
        .unwrap()
        .recent_distances()
        .is_empty());

    // Estimated hit: smoothed, so the window picks up a sample.
    sensor.queue_hit(Some(estimated_horizontal_hit(Vec3::new(1.5, 0.0, 0.0))));
    session.handle_event(SessionEvent::FrameTick);
    assert_eq!(
        session
            .scene()
            .object(object)
            .unwrap()
            .recent_distances()
            .len(),
        1
    );
}

#[test]
fn pan_end_commits_anchor_once_and_clears_state() {
    let (_sensor, mut session, object) = session_with_object();
    let commits_before = session.scene().committed_anchor(object).unwrap().count;

    session.handle_event(SessionEvent::Gesture(pan_began(vec![Vec2::ZERO])));
    session.handle_event(SessionEvent::Gesture(pan_changed(
        Vec2::new(50.0, 0.0),
        true,
    )));
    session.handle_event(SessionEvent::Gesture(pan_ended()));

    let commit = session.scene().committed_anchor(object).unwrap();
    assert_eq!(commit.count, commits_before + 1);
    assert_eq!(session.controller().tracked_object(), None);
    assert_eq!(session.controller().tracking_point(), None);

    // A stray tick after the drag ended must not move anything.
    let before = session.scene().object(object).unwrap().transform();
    session.handle_event(SessionEvent::FrameTick);
    assert_eq!(session.scene().object(object).unwrap().transform(), before);
}

#[test]
fn soft_misses_keep_object_and_tracking_state() {
    let (sensor, mut session, object) = session_with_object();

    session.handle_event(SessionEvent::Gesture(pan_began(vec![Vec2::ZERO])));
    session.handle_event(SessionEvent::Gesture(pan_changed(
        Vec2::new(50.0, 0.0),
        true,
    )));
    let before = session.scene().object(object).unwrap().transform();

    // The sensor stops returning anything, indefinitely.
    sensor.set_default_hit(None);
    for _ in 0..10 {
        session.handle_event(SessionEvent::FrameTick);
    }

    assert_eq!(session.scene().object(object).unwrap().transform(), before);
    assert_eq!(session.controller().tracked_object(), Some(object));
    assert_eq!(
        session.controller().tracking_point(),
        Some(Vec2::new(50.0, 0.0))
    );
}

//! Property-based tests for placement math
//!
//! Validates the placement invariants:
//! - Objects never end up farther than the camera clamp allows
//! - The smoothing window is bounded and its average stays inside the
//!   sample range
//! - Alignment round-trips always restore the remembered horizontal yaw

use arplace_core::Alignment;
use arplace_object::{
    DistanceWindow, PlacedObject, DISTANCE_WINDOW_CAPACITY, MAX_DISTANCE_FROM_CAMERA,
};
use glam::{Mat4, Vec3};
use proptest::prelude::*;

proptest! {
    /// Property: the object's distance from the camera never exceeds the
    /// clamp, smoothed or not.
    #[test]
    fn placement_respects_camera_clamp(
        cx in -50.0f32..50.0,
        cy in -50.0f32..50.0,
        cz in -50.0f32..50.0,
        px in -50.0f32..50.0,
        py in -50.0f32..50.0,
        pz in -50.0f32..50.0,
        smooth in any::<bool>(),
    ) {
        let camera = Mat4::from_translation(Vec3::new(cx, cy, cz));
        let candidate = Mat4::from_translation(Vec3::new(px, py, pz));

        let mut object = PlacedObject::new();
        object.set_transform(candidate, camera, smooth, Alignment::Horizontal, false);

        let distance = (object.position() - Vec3::new(cx, cy, cz)).length();
        prop_assert!(
            distance <= MAX_DISTANCE_FROM_CAMERA + 1e-3,
            "object ended up {} units from the camera",
            distance
        );
        prop_assert!(object.position().is_finite());
    }

    /// Property: the window never overflows and its average stays within
    /// the range of the samples it holds.
    #[test]
    fn window_average_is_bounded_by_contents(
        samples in prop::collection::vec(0.1f32..20.0, 1..40),
    ) {
        let mut window = DistanceWindow::new();
        for sample in &samples {
            window.push(*sample);
        }

        prop_assert!(window.len() <= DISTANCE_WINDOW_CAPACITY);

        let held: Vec<f32> = window.iter().collect();
        let min = held.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = held.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let average = window.average().unwrap();
        prop_assert!(
            average >= min - 1e-4 && average <= max + 1e-4,
            "average {} outside [{}, {}]",
            average,
            min,
            max
        );
    }

    /// Property: horizontal yaw survives any vertical excursion.
    #[test]
    fn vertical_excursion_restores_horizontal_yaw(
        theta in -3.0f32..3.0,
        vertical_yaw in -10.0f32..10.0,
    ) {
        let mut object = PlacedObject::new();
        object.set_yaw(theta);

        object.update_alignment(Alignment::Vertical, Mat4::IDENTITY, false);
        object.set_yaw(vertical_yaw);
        object.update_alignment(Alignment::Horizontal, Mat4::IDENTITY, false);

        prop_assert!(
            (object.yaw() - theta).abs() < 1e-4,
            "expected yaw {} after round trip, got {}",
            theta,
            object.yaw()
        );
    }
}

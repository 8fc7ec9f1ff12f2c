//! Small transform helpers used across the placement crates.

use glam::{Mat4, Vec3};

/// Normalize a yaw angle into `(-PI, PI]`.
///
/// This is the single normalization used for every rotation write, so the
/// remembered horizontal yaw and the live yaw always agree on range.
pub fn normalize_yaw(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};

    let mut normalized = angle.rem_euclid(TAU);
    if normalized > PI {
        normalized -= TAU;
    }
    normalized
}

/// Extract the translation column of a rigid transform.
pub fn translation(transform: &Mat4) -> Vec3 {
    transform.w_axis.truncate()
}

/// Return `transform` with its translation replaced, rotation untouched.
pub fn with_translation(transform: Mat4, position: Vec3) -> Mat4 {
    let mut out = transform;
    out.w_axis = position.extend(1.0);
    out
}

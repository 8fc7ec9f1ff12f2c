//! Detected planar surface descriptions.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{math, Alignment};

/// Stable identity of a physical surface across detection updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId(pub u64);

/// Errors from misusing a [`SurfaceAnchor`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnchorError {
    /// An update carried a different anchor identity.
    #[error("anchor update for {got:?} applied to anchor {expected:?}")]
    IdentityMismatch {
        /// Identity of the anchor being updated.
        expected: AnchorId,
        /// Identity carried by the update.
        got: AnchorId,
    },
    /// An update tried to change the surface alignment, which is immutable
    /// for a given anchor instance.
    #[error("anchor {id:?} alignment is immutable ({current:?}, update carried {got:?})")]
    AlignmentChanged {
        /// Identity of the anchor being updated.
        id: AnchorId,
        /// The anchor's alignment.
        current: Alignment,
        /// Alignment carried by the update.
        got: Alignment,
    },
}

/// Geometric description of a detected planar region.
///
/// `center` and `extent` live in the surface's local frame, where the plane
/// normal is the local Y axis; `world_transform` places that frame in world
/// space. Detection refreshes replace center/extent/transform under the same
/// identity; alignment never changes for a given anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceAnchor {
    id: AnchorId,
    alignment: Alignment,
    /// Center of the detected region in the surface-local frame.
    pub center: Vec3,
    /// Width (x) and depth (z) of the detected region.
    pub extent: Vec2,
    /// Rigid transform from the surface-local frame to world space.
    pub world_transform: Mat4,
}

impl SurfaceAnchor {
    /// Create an anchor for a freshly detected surface.
    pub fn new(
        id: AnchorId,
        alignment: Alignment,
        center: Vec3,
        extent: Vec2,
        world_transform: Mat4,
    ) -> Self {
        debug_assert!(extent.x >= 0.0 && extent.y >= 0.0);
        Self {
            id,
            alignment,
            center,
            extent,
            world_transform,
        }
    }

    /// Identity of the physical surface.
    pub fn id(&self) -> AnchorId {
        self.id
    }

    /// Orientation class of the surface. Immutable for this instance.
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Refresh geometry from a newer detection of the same surface.
    ///
    /// Identity and alignment must match; only center, extent, and the world
    /// transform are replaced.
    pub fn update_from(&mut self, update: &SurfaceAnchor) -> Result<(), AnchorError> {
        if update.id != self.id {
            return Err(AnchorError::IdentityMismatch {
                expected: self.id,
                got: update.id,
            });
        }
        if update.alignment != self.alignment {
            return Err(AnchorError::AlignmentChanged {
                id: self.id,
                current: self.alignment,
                got: update.alignment,
            });
        }
        self.center = update.center;
        self.extent = update.extent;
        self.world_transform = update.world_transform;
        Ok(())
    }

    /// Express a world-space point in the surface-local frame.
    pub fn world_to_local(&self, point: Vec3) -> Vec3 {
        self.world_transform.inverse().transform_point3(point)
    }

    /// World-space height of the surface plane.
    pub fn surface_height(&self) -> f32 {
        math::translation(&self.world_transform).y
    }

    /// Test a surface-local point against the detected rectangle, expanded
    /// by `tolerance * extent` on each planar axis.
    pub fn contains_with_tolerance(&self, local: Vec3, tolerance: f32) -> bool {
        let slack = self.extent * tolerance;
        let min_x = self.center.x - self.extent.x / 2.0 - slack.x;
        let max_x = self.center.x + self.extent.x / 2.0 + slack.x;
        let min_z = self.center.z - self.extent.y / 2.0 - slack.y;
        let max_z = self.center.z + self.extent.y / 2.0 + slack.y;
        (min_x..=max_x).contains(&local.x) && (min_z..=max_z).contains(&local.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor() -> SurfaceAnchor {
        SurfaceAnchor::new(
            AnchorId(1),
            Alignment::Horizontal,
            Vec3::ZERO,
            Vec2::new(2.0, 1.0),
            Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0)),
        )
    }

    #[test]
    fn update_replaces_geometry_only() {
        let mut a = anchor();
        let update = SurfaceAnchor::new(
            AnchorId(1),
            Alignment::Horizontal,
            Vec3::new(0.1, 0.0, 0.2),
            Vec2::new(3.0, 2.0),
            Mat4::from_translation(Vec3::new(0.0, 0.6, 0.0)),
        );
        a.update_from(&update).unwrap();
        assert_eq!(a.center, Vec3::new(0.1, 0.0, 0.2));
        assert_eq!(a.extent, Vec2::new(3.0, 2.0));
        assert_eq!(a.surface_height(), 0.6);
        assert_eq!(a.alignment(), Alignment::Horizontal);
    }

    #[test]
    fn update_rejects_identity_mismatch() {
        let mut a = anchor();
        let mut other = anchor();
        other.id = AnchorId(2);
        assert_eq!(
            a.update_from(&other),
            Err(AnchorError::IdentityMismatch {
                expected: AnchorId(1),
                got: AnchorId(2),
            })
        );
    }

    #[test]
    fn update_rejects_alignment_change() {
        let mut a = anchor();
        let mut wall = anchor();
        wall.alignment = Alignment::Vertical;
        assert!(matches!(
            a.update_from(&wall),
            Err(AnchorError::AlignmentChanged { .. })
        ));
    }

    #[test]
    fn world_to_local_inverts_transform() {
        let a = anchor();
        let local = a.world_to_local(Vec3::new(0.3, 0.5, -0.2));
        assert!((local - Vec3::new(0.3, 0.0, -0.2)).length() < 1e-6);
    }

    #[test]
    fn tolerance_expands_inclusion_rectangle() {
        let a = anchor();
        // Rectangle is x in [-1, 1], z in [-0.5, 0.5]; 10% widens x by 0.2.
        assert!(a.contains_with_tolerance(Vec3::new(1.15, 0.0, 0.0), 0.1));
        assert!(!a.contains_with_tolerance(Vec3::new(1.25, 0.0, 0.0), 0.1));
        assert!(a.contains_with_tolerance(Vec3::new(0.0, 0.0, 0.58), 0.1));
        assert!(!a.contains_with_tolerance(Vec3::new(0.0, 0.0, 0.62), 0.1));
    }
}

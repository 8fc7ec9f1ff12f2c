//! The world-sensing collaborator boundary.
//!
//! Plane detection and 3D hit-testing happen outside this workspace (in the
//! AR tracking subsystem); this trait is the seam the controller talks to.

use arplace_core::{Alignment, ScreenPoint, SurfaceAnchor};
use glam::{Mat4, Vec3};

use crate::scene::NodeId;

/// Classification of a screen-to-world hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// The ray hit a committed, tracked surface anchor.
    ExistingPlane,
    /// The ray hit a plane estimated as horizontal, with no anchor yet.
    EstimatedHorizontal,
    /// The ray hit a plane estimated as vertical, with no anchor yet.
    EstimatedVertical,
    /// Feature-point or other hit with no usable alignment.
    Other,
}

/// A screen-to-world hit-test result.
#[derive(Debug, Clone, PartialEq)]
pub struct HitResult {
    /// World transform of the hit location.
    pub world_transform: Mat4,
    /// The surface anchor backing the hit, if any.
    pub anchor: Option<SurfaceAnchor>,
    /// Hit classification, used when no anchor backs the result.
    pub kind: HitKind,
}

impl HitResult {
    /// Whether the hit landed on a committed surface anchor. Anchored hits
    /// are trusted (applied without smoothing); estimated hits are not.
    pub fn is_on_existing_plane(&self) -> bool {
        self.anchor.is_some()
    }

    /// Alignment of the hit surface: the anchor's if one backs the hit,
    /// otherwise the estimated classification. `None` means the hit is
    /// unusable for placement.
    pub fn alignment(&self) -> Option<Alignment> {
        if let Some(anchor) = &self.anchor {
            return Some(anchor.alignment());
        }
        match self.kind {
            HitKind::EstimatedHorizontal => Some(Alignment::Horizontal),
            HitKind::EstimatedVertical => Some(Alignment::Vertical),
            HitKind::ExistingPlane | HitKind::Other => None,
        }
    }
}

/// External collaborator supplying camera pose, hit-testing, and picking.
pub trait WorldSensing {
    /// Current world transform of the device camera.
    fn camera_transform(&self) -> Mat4;

    /// Cast a ray through `point` and test against detected surfaces.
    ///
    /// `infinite_plane` extends detected planes beyond their measured
    /// extents; `object_position` lets the implementation prefer hits near
    /// the object being moved; `allowed_alignments` filters candidate
    /// surfaces. `None` is a soft miss, never an error.
    fn hit_test(
        &self,
        point: ScreenPoint,
        infinite_plane: bool,
        object_position: Vec3,
        allowed_alignments: &[Alignment],
    ) -> Option<HitResult>;

    /// Scene node directly under a screen point, if any.
    fn pick_node(&self, point: ScreenPoint) -> Option<NodeId>;

    /// Project a world-space point to screen coordinates.
    fn project_point(&self, world: Vec3) -> ScreenPoint;
}

#![warn(missing_docs)]
//! Virtual object placement on sensed planar surfaces.
//!
//! [`PlacedObject`] owns a world transform, the horizontal/vertical alignment
//! state machine, the remembered horizontal yaw, and a bounded window of
//! recent camera distances used to damp hit-test depth jitter. Transform
//! writes go through scoped transactions so a renderer sees each update as a
//! single (possibly animated) step.

mod transaction;
mod window;

pub use transaction::{Animation, Easing};
pub use window::{DistanceWindow, DISTANCE_WINDOW_CAPACITY};

use glam::{Mat4, Vec3};
use tracing::trace;

use arplace_core::{
    normalize_yaw, translation, with_translation, Alignment, AnchorId, SurfaceAnchor,
};
use transaction::TransformTransaction;

/// Maximum distance (world units) content may be placed from the camera.
/// Bounds degenerate placements produced by noisy hits.
pub const MAX_DISTANCE_FROM_CAMERA: f32 = 10.0;

/// Duration of the animation run when a transform update flips alignment.
pub const ALIGNMENT_ANIMATION_DURATION: f32 = 0.5;

/// Fractional widening of a surface rectangle when deciding whether an
/// object is "over" it for snap correction.
pub const SNAP_PLANAR_TOLERANCE: f32 = 0.1;

/// Vertical offsets below this (1 mm) are floating-point noise, not gaps.
pub const SNAP_EPSILON: f32 = 0.001;

/// Vertical offsets at or above this (5 cm) mean the object is not actually
/// resting on the surface; snapping them silently would teleport content.
pub const SNAP_VERTICAL_ALLOWANCE: f32 = 0.05;

/// Snap descent duration per world unit of gap: 2 mm per time unit.
pub const SNAP_DURATION_PER_UNIT: f32 = 500.0;

/// A virtual object resting on (and re-positioned against) sensed surfaces.
#[derive(Debug, Clone)]
pub struct PlacedObject {
    /// Current world transform. Translation is written only by
    /// `set_transform`, snap correction, and alignment transactions.
    transform: Mat4,
    /// Yaw of the object's visual child, always normalized.
    yaw: f32,
    current_alignment: Alignment,
    /// Last yaw used while horizontally placed, restored after a vertical
    /// excursion.
    rotation_when_horizontal: f32,
    recent_distances: DistanceWindow,
    animation: Option<Animation>,
    anchor_id: Option<AnchorId>,
}

impl Default for PlacedObject {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacedObject {
    /// Create an object at the world origin, horizontally aligned.
    pub fn new() -> Self {
        Self {
            transform: Mat4::IDENTITY,
            yaw: 0.0,
            current_alignment: Alignment::Horizontal,
            rotation_when_horizontal: 0.0,
            recent_distances: DistanceWindow::new(),
            animation: None,
            anchor_id: None,
        }
    }

    /// Current world transform.
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Current world position.
    pub fn position(&self) -> Vec3 {
        translation(&self.transform)
    }

    /// Alignment of the surface the object currently rests on.
    pub fn current_alignment(&self) -> Alignment {
        self.current_alignment
    }

    /// Yaw of the object's visual child.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Assign the visual child's yaw.
    ///
    /// The single normalization point: the value is wrapped into `(-PI, PI]`
    /// before assignment, and while horizontally aligned it is also stored as
    /// the remembered horizontal yaw. Every rotation write funnels through
    /// here so the two stay consistent.
    pub fn set_yaw(&mut self, yaw: f32) {
        let normalized = normalize_yaw(yaw);
        self.yaw = normalized;
        if self.current_alignment == Alignment::Horizontal {
            self.rotation_when_horizontal = normalized;
        }
    }

    /// Yaw that will be restored when the object returns to a horizontal
    /// surface.
    pub fn rotation_when_horizontal(&self) -> f32 {
        self.rotation_when_horizontal
    }

    /// Animation descriptor committed by the last transform update, if any.
    pub fn animation(&self) -> Option<Animation> {
        self.animation
    }

    /// Identity of the surface anchor this object was last committed to.
    pub fn anchor_id(&self) -> Option<AnchorId> {
        self.anchor_id
    }

    /// Record the anchor this object is committed to.
    pub fn set_anchor_id(&mut self, id: AnchorId) {
        self.anchor_id = Some(id);
    }

    /// Recent camera-distance samples (smoothed placements only).
    pub fn recent_distances(&self) -> &DistanceWindow {
        &self.recent_distances
    }

    /// Re-position the object from a candidate world transform.
    ///
    /// The candidate's offset from the camera is clamped to
    /// [`MAX_DISTANCE_FROM_CAMERA`]. With `smooth_movement` the offset's
    /// length is averaged over the recent-distance window before being
    /// re-applied along the offset direction, damping depth jitter while
    /// leaving lateral motion untouched. Without it the clamped offset is
    /// applied exactly (the tap-to-teleport path).
    pub fn set_transform(
        &mut self,
        new_transform: Mat4,
        camera_transform: Mat4,
        smooth_movement: bool,
        alignment: Alignment,
        allow_animation: bool,
    ) {
        let camera_position = translation(&camera_transform);
        let mut offset = translation(&new_transform) - camera_position;

        let distance = offset.length();
        if distance > MAX_DISTANCE_FROM_CAMERA {
            offset = offset / distance * MAX_DISTANCE_FROM_CAMERA;
        }

        let position = if smooth_movement {
            let sample = offset.length();
            self.recent_distances.push(sample);
            let average = self.recent_distances.average().unwrap_or(sample);
            match offset.try_normalize() {
                Some(direction) => camera_position + direction * average,
                // Candidate coincides with the camera; nothing to project along.
                None => camera_position,
            }
        } else {
            camera_position + offset
        };

        self.transform = with_translation(self.transform, position);
        self.update_alignment(alignment, new_transform, allow_animation);
    }

    /// Run the alignment state machine against a candidate transform.
    ///
    /// Horizontal→Horizontal is a pure no-op. Vertical→Horizontal restores
    /// the remembered horizontal yaw. Horizontal→Vertical leaves yaw to
    /// whatever the candidate transform implies. The candidate's rotation is
    /// applied together with the *filtered* position already stored on the
    /// object, inside a transaction animated only when the alignment
    /// actually changed and `allow_animation` holds.
    pub fn update_alignment(
        &mut self,
        new_alignment: Alignment,
        transform: Mat4,
        allow_animation: bool,
    ) {
        let changed = new_alignment != self.current_alignment;
        let duration = if changed && allow_animation {
            ALIGNMENT_ANIMATION_DURATION
        } else {
            0.0
        };

        let new_yaw = match (self.current_alignment, new_alignment) {
            // Staying horizontal needs no transform or rotation change at
            // all (unlike vertical, where the surface's world-y rotation can
            // differ between walls).
            (Alignment::Horizontal, Alignment::Horizontal) => return,
            (Alignment::Vertical, Alignment::Horizontal) => Some(self.rotation_when_horizontal),
            // Moving onto a wall keeps the candidate's implied yaw; staying
            // on walls needs no reset.
            (Alignment::Horizontal, Alignment::Vertical)
            | (Alignment::Vertical, Alignment::Vertical) => None,
        };

        if changed {
            trace!(?new_alignment, animated = duration > 0.0, "alignment change");
        }
        self.current_alignment = new_alignment;

        let mut txn = TransformTransaction::new(self, duration, Easing::Linear);
        // Candidate rotation, filtered position: the raw candidate
        // translation is exactly the noise set_transform just smoothed away.
        let filtered = txn.position();
        txn.transform = with_translation(transform, filtered);
        if let Some(yaw) = new_yaw {
            txn.set_yaw(yaw);
        }
    }

    /// Pull the object flush onto an updated surface anchor.
    ///
    /// Applies only when the object sits over the anchor's (tolerance
    ///-expanded) rectangle and its vertical gap is between [`SNAP_EPSILON`]
    /// and [`SNAP_VERTICAL_ALLOWANCE`]. The descent animates at a constant
    /// 2 mm per time unit with ease-in/ease-out. Returns whether a
    /// correction was applied.
    pub fn snap_onto_surface(&mut self, anchor: &SurfaceAnchor) -> bool {
        let local = anchor.world_to_local(self.position());

        // Already flush; re-issuing the move would only churn animations.
        if local.y == 0.0 {
            return false;
        }
        if !anchor.contains_with_tolerance(local, SNAP_PLANAR_TOLERANCE) {
            return false;
        }

        let gap = local.y.abs();
        if gap <= SNAP_EPSILON || gap >= SNAP_VERTICAL_ALLOWANCE {
            return false;
        }

        trace!(anchor = ?anchor.id(), gap, "snapping onto surface");

        // Alignment first: for the usual horizontal-onto-horizontal case it
        // is a no-op, and the snap's own animation should be the one left
        // committed on the object.
        let current = self.transform;
        self.update_alignment(anchor.alignment(), current, false);

        let mut txn =
            TransformTransaction::new(self, gap * SNAP_DURATION_PER_UNIT, Easing::EaseInOut);
        let mut position = txn.position();
        position.y = anchor.surface_height();
        txn.transform = with_translation(txn.transform, position);
        true
    }
}

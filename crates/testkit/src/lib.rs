#![warn(missing_docs)]
//! Deterministic test doubles for the interaction stack.
//!
//! [`ScriptedSensor`] stands in for the AR tracking subsystem: canned
//! hit-test results, screen-region picking, and a fixed top-down projection,
//! with every hit-test call recorded for assertions. Gesture builders keep
//! integration tests terse.

use std::collections::VecDeque;
use std::sync::Mutex;

use arplace_core::{Alignment, ScreenPoint, SurfaceAnchor};
use arplace_interaction::{Gesture, GesturePhase, HitKind, HitResult, NodeId, WorldSensing};
use glam::{Mat4, Vec2, Vec3};

/// A recorded hit-test invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct HitTestCall {
    /// Screen point that was resolved.
    pub point: ScreenPoint,
    /// Whether the infinite-plane assumption was requested.
    pub infinite_plane: bool,
    /// Alignments the caller allowed.
    pub allowed: Vec<Alignment>,
}

struct PickRegion {
    center: ScreenPoint,
    radius: f32,
    node: NodeId,
}

/// Scripted stand-in for the world-sensing collaborator.
///
/// Hit tests consume an explicit queue first and fall back to a default
/// result; both are set by the test. Picking maps screen regions to scene
/// nodes. Projection is a fixed top-down map: world (x, z) times
/// `pixels_per_unit`.
pub struct ScriptedSensor {
    camera: Mutex<Mat4>,
    queued_hits: Mutex<VecDeque<Option<HitResult>>>,
    default_hit: Mutex<Option<HitResult>>,
    pick_regions: Mutex<Vec<PickRegion>>,
    calls: Mutex<Vec<HitTestCall>>,
    pixels_per_unit: f32,
}

impl Default for ScriptedSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedSensor {
    /// Sensor with the camera at the origin and 100 pixels per world unit.
    pub fn new() -> Self {
        Self {
            camera: Mutex::new(Mat4::IDENTITY),
            queued_hits: Mutex::new(VecDeque::new()),
            default_hit: Mutex::new(None),
            pick_regions: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            pixels_per_unit: 100.0,
        }
    }

    /// Move the camera.
    pub fn set_camera(&self, transform: Mat4) {
        *self.camera.lock().unwrap() = transform;
    }

    /// Queue one hit-test result (or an explicit miss) to be consumed
    /// before the default.
    pub fn queue_hit(&self, hit: Option<HitResult>) {
        self.queued_hits.lock().unwrap().push_back(hit);
    }

    /// Result returned once the queue is drained. `None` means every
    /// unqueued hit test misses.
    pub fn set_default_hit(&self, hit: Option<HitResult>) {
        *self.default_hit.lock().unwrap() = hit;
    }

    /// Make `node` pickable within `radius` of `center` on screen.
    pub fn add_pick_region(&self, center: ScreenPoint, radius: f32, node: NodeId) {
        self.pick_regions.lock().unwrap().push(PickRegion {
            center,
            radius,
            node,
        });
    }

    /// Every hit-test call made so far, in order.
    pub fn hit_test_calls(&self) -> Vec<HitTestCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl WorldSensing for ScriptedSensor {
    fn camera_transform(&self) -> Mat4 {
        *self.camera.lock().unwrap()
    }

    fn hit_test(
        &self,
        point: ScreenPoint,
        infinite_plane: bool,
        _object_position: Vec3,
        allowed_alignments: &[Alignment],
    ) -> Option<HitResult> {
        self.calls.lock().unwrap().push(HitTestCall {
            point,
            infinite_plane,
            allowed: allowed_alignments.to_vec(),
        });
        if let Some(hit) = self.queued_hits.lock().unwrap().pop_front() {
            return hit;
        }
        self.default_hit.lock().unwrap().clone()
    }

    fn pick_node(&self, point: ScreenPoint) -> Option<NodeId> {
        self.pick_regions
            .lock()
            .unwrap()
            .iter()
            .find(|region| region.center.distance(point) <= region.radius)
            .map(|region| region.node)
    }

    fn project_point(&self, world: Vec3) -> ScreenPoint {
        Vec2::new(world.x, world.z) * self.pixels_per_unit
    }
}

/// Hit on an estimated (un-anchored) horizontal plane at `position`.
pub fn estimated_horizontal_hit(position: Vec3) -> HitResult {
    HitResult {
        world_transform: Mat4::from_translation(position),
        anchor: None,
        kind: HitKind::EstimatedHorizontal,
    }
}

/// Hit backed by a committed surface anchor, landing at `position`.
pub fn anchored_hit(anchor: SurfaceAnchor, position: Vec3) -> HitResult {
    HitResult {
        world_transform: Mat4::from_translation(position),
        anchor: Some(anchor),
        kind: HitKind::ExistingPlane,
    }
}

/// Pan-began event with the given touch locations.
pub fn pan_began(locations: Vec<ScreenPoint>) -> Gesture {
    Gesture::Pan {
        phase: GesturePhase::Began,
        translation: Vec2::ZERO,
        locations,
        threshold_exceeded: false,
    }
}

/// Pan-changed event carrying an incremental screen translation.
pub fn pan_changed(translation: Vec2, threshold_exceeded: bool) -> Gesture {
    Gesture::Pan {
        phase: GesturePhase::Changed,
        translation,
        locations: Vec::new(),
        threshold_exceeded,
    }
}

/// Pan-ended event.
pub fn pan_ended() -> Gesture {
    Gesture::Pan {
        phase: GesturePhase::Ended,
        translation: Vec2::ZERO,
        locations: Vec::new(),
        threshold_exceeded: true,
    }
}

/// Rotate-changed event with an incremental delta in radians.
pub fn rotate_changed(delta: f32) -> Gesture {
    Gesture::Rotate {
        phase: GesturePhase::Changed,
        delta,
    }
}

/// Tap event at a screen location.
pub fn tap(location: ScreenPoint) -> Gesture {
    Gesture::Tap { location }
}

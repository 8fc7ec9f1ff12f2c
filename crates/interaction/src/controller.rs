//! Gesture state machine driving object placement.

use std::sync::Arc;

use arplace_core::{Alignment, ScreenPoint};
use glam::Vec2;
use tracing::{debug, trace};

use crate::gesture::{centroid, Gesture, GesturePhase};
use crate::scene::{ObjectId, Scene};
use crate::sensor::WorldSensing;

/// Consumes gesture events and maps them onto object transform updates.
///
/// Holds at most one tracked object (by id; the scene store keeps
/// ownership) and, while a drag is mid-flight, the screen point being
/// tracked. Hit-test misses, stale object ids, and unusable alignments
/// all degrade to "do nothing this frame".
pub struct InteractionController<S> {
    sensor: Arc<S>,
    /// Translate assuming the detected plane extends infinitely. Developer
    /// setting; applies to drag resolution, not taps.
    pub translate_assuming_infinite_plane: bool,
    tracked: Option<ObjectId>,
    tracking_point: Option<ScreenPoint>,
}

impl<S: WorldSensing> InteractionController<S> {
    /// Create a controller talking to the given sensor.
    pub fn new(sensor: Arc<S>) -> Self {
        Self {
            sensor,
            translate_assuming_infinite_plane: true,
            tracked: None,
            tracking_point: None,
        }
    }

    /// The object currently under manipulation, if any.
    pub fn tracked_object(&self) -> Option<ObjectId> {
        self.tracked
    }

    /// The live drag tracking point. `Some` only mid-drag.
    pub fn tracking_point(&self) -> Option<ScreenPoint> {
        self.tracking_point
    }

    /// Feed one gesture event through the state machine.
    pub fn handle_gesture(&mut self, scene: &mut Scene, gesture: Gesture) {
        match gesture {
            Gesture::Pan {
                phase,
                translation,
                locations,
                threshold_exceeded,
            } => self.handle_pan(scene, phase, translation, &locations, threshold_exceeded),
            Gesture::Rotate { phase, delta } => self.handle_rotate(scene, phase, delta),
            Gesture::Tap { location } => self.handle_tap(scene, location),
        }
    }

    fn handle_pan(
        &mut self,
        scene: &mut Scene,
        phase: GesturePhase,
        translation: Vec2,
        locations: &[ScreenPoint],
        threshold_exceeded: bool,
    ) {
        match phase {
            GesturePhase::Began => {
                // Check for interaction with a new object.
                if let Some(id) = self.object_interacting(scene, locations) {
                    trace!(?id, "pan began over object");
                    self.tracked = Some(id);
                }
            }
            GesturePhase::Changed if threshold_exceeded => {
                let Some(id) = self.tracked else { return };
                let Some(object) = scene.object(id) else {
                    return;
                };

                // Anchor the drag to the object's current screen projection
                // rather than the touch-down point, so the object doesn't
                // jump when the drag starts.
                let current = self
                    .tracking_point
                    .unwrap_or_else(|| self.sensor.project_point(object.position()));
                self.tracking_point = Some(current + translation);
            }
            GesturePhase::Changed => {
                // Below the displacement threshold; ignore.
            }
            GesturePhase::Ended | GesturePhase::Cancelled => {
                // Update the object's anchor once, then return to idle.
                if let Some(id) = self.tracked {
                    scene.commit_anchor(id);
                }
                self.tracking_point = None;
                self.tracked = None;
            }
        }
    }

    fn handle_rotate(&mut self, scene: &mut Scene, phase: GesturePhase, delta: f32) {
        if phase != GesturePhase::Changed {
            return;
        }
        let Some(object) = self.tracked.and_then(|id| scene.object_mut(id)) else {
            return;
        };
        // Subtracting matches looking down on the object, which is the
        // overwhelmingly common case; looking up from below would need the
        // opposite sign.
        let yaw = object.yaw();
        object.set_yaw(yaw - delta);
    }

    fn handle_tap(&mut self, scene: &mut Scene, location: ScreenPoint) {
        if let Some(id) = self.pick_object(scene, location) {
            // Select a new object; taps never start a drag.
            debug!(?id, "tap selected object");
            self.tracked = Some(id);
        } else if let Some(id) = self.tracked {
            // Teleport the tracked object to wherever the user tapped.
            debug!(?id, "tap teleports tracked object");
            self.translate(scene, id, location, false, false);
            scene.commit_anchor(id);
        }
    }

    /// Per-frame hook: while a drag is live, re-resolve the tracking point
    /// to world space. Runs off the render loop, so dragging keeps tracking
    /// when the device moves even if the finger does not.
    pub fn update_tracked_object(&mut self, scene: &mut Scene) {
        let (Some(id), Some(point)) = (self.tracked, self.tracking_point) else {
            return;
        };
        self.translate(
            scene,
            id,
            point,
            self.translate_assuming_infinite_plane,
            true,
        );
    }

    /// Resolve a screen point to world space and re-position the object.
    ///
    /// Hits backed by a committed surface anchor are trusted and applied
    /// exactly; estimated hits are noisier, so their motion is smoothed. An
    /// unusable hit (no result, or no alignment) is a soft miss.
    pub fn translate(
        &self,
        scene: &mut Scene,
        id: ObjectId,
        screen_point: ScreenPoint,
        infinite_plane: bool,
        allow_animation: bool,
    ) {
        let Some(object_position) = scene.object(id).map(|o| o.position()) else {
            return;
        };
        let camera = self.sensor.camera_transform();
        let Some(hit) = self.sensor.hit_test(
            screen_point,
            infinite_plane,
            object_position,
            &[Alignment::Horizontal],
        ) else {
            trace!("hit test missed; skipping frame");
            return;
        };
        let Some(alignment) = hit.alignment() else {
            trace!(kind = ?hit.kind, "hit has no usable alignment; skipping frame");
            return;
        };

        let smooth_movement = !hit.is_on_existing_plane();
        if let Some(object) = scene.object_mut(id) {
            object.set_transform(
                hit.world_transform,
                camera,
                smooth_movement,
                alignment,
                allow_animation,
            );
        }
    }

    /// First object found under any of the touch locations, falling back to
    /// the centroid of all touches.
    fn object_interacting(&self, scene: &Scene, locations: &[ScreenPoint]) -> Option<ObjectId> {
        for &location in locations {
            if let Some(id) = self.pick_object(scene, location) {
                return Some(id);
            }
        }
        self.pick_object(scene, centroid(locations)?)
    }

    fn pick_object(&self, scene: &Scene, location: ScreenPoint) -> Option<ObjectId> {
        let node = self.sensor.pick_node(location)?;
        scene.placed_object_ancestor(node)
    }
}

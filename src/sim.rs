//! Synthetic world sensing for the headless demo.
//!
//! Models a single flat floor at world height zero, seen top-down: screen
//! points map linearly to floor points. Hits over the detected surface
//! rectangle come back anchored and exact; hits elsewhere are estimated
//! horizontal planes with seeded depth noise, which is what makes the
//! smoothing path observable in the demo logs.

use std::sync::Mutex;

use arplace_core::{Alignment, ScreenPoint, SurfaceAnchor};
use arplace_interaction::{HitKind, HitResult, NodeId, WorldSensing};
use glam::{Mat4, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::DemoConfig;

struct PickRegion {
    center: ScreenPoint,
    radius: f32,
    node: NodeId,
}

pub struct JitteredFloorSensor {
    camera: Mutex<Mat4>,
    surface: Mutex<Option<SurfaceAnchor>>,
    pick_regions: Mutex<Vec<PickRegion>>,
    rng: Mutex<StdRng>,
    screen_center: Vec2,
    pixels_per_unit: f32,
    depth_jitter: f32,
}

impl JitteredFloorSensor {
    pub fn new(cfg: &DemoConfig) -> Self {
        Self {
            // Arm's-length device height over the floor.
            camera: Mutex::new(Mat4::from_translation(Vec3::new(0.0, 1.4, 0.0))),
            surface: Mutex::new(None),
            pick_regions: Mutex::new(Vec::new()),
            rng: Mutex::new(StdRng::seed_from_u64(cfg.noise_seed)),
            screen_center: cfg.screen_center(),
            pixels_per_unit: cfg.pixels_per_unit,
            depth_jitter: cfg.depth_jitter,
        }
    }

    /// Begin treating `anchor` as the committed, tracked surface.
    pub fn detect_surface(&self, anchor: SurfaceAnchor) {
        *self.surface.lock().unwrap() = Some(anchor);
    }

    /// Nudge the simulated device camera.
    pub fn move_camera(&self, delta: Vec3) {
        let mut camera = self.camera.lock().unwrap();
        let translation = arplace_core::translation(&camera) + delta;
        *camera = arplace_core::with_translation(*camera, translation);
    }

    /// Make `node` pickable within `radius` pixels of `center`.
    pub fn track_node(&self, center: ScreenPoint, radius: f32, node: NodeId) {
        self.pick_regions.lock().unwrap().push(PickRegion {
            center,
            radius,
            node,
        });
    }

    fn screen_to_floor(&self, point: ScreenPoint) -> Vec3 {
        let offset = (point - self.screen_center) / self.pixels_per_unit;
        Vec3::new(offset.x, 0.0, offset.y)
    }
}

impl WorldSensing for JitteredFloorSensor {
    fn camera_transform(&self) -> Mat4 {
        *self.camera.lock().unwrap()
    }

    fn hit_test(
        &self,
        point: ScreenPoint,
        _infinite_plane: bool,
        _object_position: Vec3,
        allowed_alignments: &[Alignment],
    ) -> Option<HitResult> {
        if !allowed_alignments.contains(&Alignment::Horizontal) {
            return None;
        }

        let floor_point = self.screen_to_floor(point);
        let surface = self.surface.lock().unwrap();
        if let Some(anchor) = surface.as_ref() {
            let local = anchor.world_to_local(floor_point);
            if anchor.contains_with_tolerance(local, 0.0) {
                // Plane hits are trusted and come back exact.
                return Some(HitResult {
                    world_transform: Mat4::from_translation(floor_point),
                    anchor: Some(anchor.clone()),
                    kind: HitKind::ExistingPlane,
                });
            }
        }

        // Off the detected surface: estimated plane with noisy depth.
        let camera_position = arplace_core::translation(&self.camera_transform());
        let jitter = self.rng.lock().unwrap().gen_range(-1.0..=1.0) * self.depth_jitter;
        let direction = (floor_point - camera_position).normalize_or_zero();
        Some(HitResult {
            world_transform: Mat4::from_translation(floor_point + direction * jitter),
            anchor: None,
            kind: HitKind::EstimatedHorizontal,
        })
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
        Vec2::new(world.x, world.z) * self.pixels_per_unit + self.screen_center
    }
}

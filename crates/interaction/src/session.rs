//! Session wiring: one logical owner for all per-frame mutation.
//!
//! [`Session`] owns the scene store and controller and processes
//! [`SessionEvent`]s one at a time. [`SessionQueue`] moves a session onto a
//! dedicated worker thread fed by an mpsc channel, so gesture detection can
//! run on a UI-facing thread and only post resolved events. Frame ticks
//! coalesce: a tick posted while the previous one is still unprocessed is
//! dropped. Ordering is guaranteed; completion of every tick is not.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};
use arplace_core::{AnchorId, ScreenPoint, SurfaceAnchor};
use arplace_object::PlacedObject;
use tracing::{info, trace, warn};

use crate::controller::InteractionController;
use crate::gesture::Gesture;
use crate::scene::{NodeId, ObjectId, Scene};
use crate::sensor::WorldSensing;

/// An event posted onto the session's serial queue.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A gesture from the recognizer collaborator.
    Gesture(Gesture),
    /// The surface-detection collaborator found a new surface.
    SurfaceAdded(SurfaceAnchor),
    /// A known surface's geometry was refreshed.
    SurfaceUpdated(SurfaceAnchor),
    /// Render-loop tick; drives drag re-resolution.
    FrameTick,
}

/// Owns the scene and controller; the single mutator of both.
pub struct Session<S> {
    scene: Scene,
    controller: InteractionController<S>,
    surfaces: HashMap<AnchorId, SurfaceAnchor>,
    screen_center: ScreenPoint,
    /// The object auto-created on first surface detection, with its root
    /// scene node.
    primary_object: Option<ObjectId>,
    primary_node: Option<NodeId>,
}

impl<S: WorldSensing> Session<S> {
    /// Create a session. `screen_center` is where the first detected
    /// surface's object gets placed.
    pub fn new(sensor: Arc<S>, screen_center: ScreenPoint) -> Self {
        Self {
            scene: Scene::new(),
            controller: InteractionController::new(sensor),
            surfaces: HashMap::new(),
            screen_center,
            primary_object: None,
            primary_node: None,
        }
    }

    /// The scene store.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The gesture controller.
    pub fn controller(&self) -> &InteractionController<S> {
        &self.controller
    }

    /// Mutable access to the gesture controller (settings).
    pub fn controller_mut(&mut self) -> &mut InteractionController<S> {
        &mut self.controller
    }

    /// The object created on first surface detection, once one exists.
    pub fn primary_object(&self) -> Option<ObjectId> {
        self.primary_object
    }

    /// Root scene node of the primary object, once one exists.
    pub fn primary_node(&self) -> Option<NodeId> {
        self.primary_node
    }

    /// Process one event. Events must arrive in posting order; this is the
    /// only entry point that mutates the scene.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Gesture(gesture) => {
                self.controller.handle_gesture(&mut self.scene, gesture);
            }
            SessionEvent::SurfaceAdded(anchor) => self.on_surface_added(anchor),
            SessionEvent::SurfaceUpdated(anchor) => self.on_surface_updated(anchor),
            SessionEvent::FrameTick => {
                self.controller.update_tracked_object(&mut self.scene);
            }
        }
    }

    fn on_surface_added(&mut self, anchor: SurfaceAnchor) {
        info!(id = ?anchor.id(), alignment = ?anchor.alignment(), "surface detected");

        if self.primary_object.is_none() {
            let mut object = PlacedObject::new();
            object.set_anchor_id(anchor.id());
            let (id, node) = self.scene.add_object(object);
            self.primary_object = Some(id);
            self.primary_node = Some(node);

            // Place the new object at the screen center and pin it.
            self.controller
                .translate(&mut self.scene, id, self.screen_center, false, false);
            self.scene.commit_anchor(id);
        }

        self.surfaces.insert(anchor.id(), anchor);
    }

    fn on_surface_updated(&mut self, update: SurfaceAnchor) {
        let anchor = match self.surfaces.get_mut(&update.id()) {
            Some(anchor) => {
                if let Err(err) = anchor.update_from(&update) {
                    warn!(%err, "ignoring inconsistent surface update");
                    return;
                }
                anchor.clone()
            }
            // Updates can race ahead of the add on some sensing stacks;
            // treat them as the add.
            None => {
                self.on_surface_added(update);
                return;
            }
        };

        // The inclusion and tolerance checks inside the snap make this a
        // no-op for objects not resting on this surface.
        for id in self.scene.object_ids().collect::<Vec<_>>() {
            if let Some(object) = self.scene.object_mut(id) {
                object.snap_onto_surface(&anchor);
            }
        }
    }
}

/// Clonable, thread-safe posting handle for a [`SessionQueue`].
#[derive(Clone)]
pub struct SessionHandle {
    sender: Sender<SessionEvent>,
    tick_pending: Arc<AtomicBool>,
}

impl SessionHandle {
    /// Post an event onto the serial queue. Non-blocking.
    pub fn post(&self, event: SessionEvent) -> Result<()> {
        self.sender
            .send(event)
            .map_err(|_| anyhow!("session worker has shut down"))
    }

    /// Post a frame tick unless one is still in flight.
    ///
    /// Fire-and-forget: returns `Ok(false)` when the tick was dropped
    /// because the worker has not finished the previous one. Stale ticks
    /// are never queued up behind each other.
    pub fn post_frame_tick(&self) -> Result<bool> {
        if self
            .tick_pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            trace!("frame tick dropped; previous tick still in flight");
            return Ok(false);
        }
        if self.sender.send(SessionEvent::FrameTick).is_err() {
            self.tick_pending.store(false, Ordering::Release);
            return Err(anyhow!("session worker has shut down"));
        }
        Ok(true)
    }
}

/// Runs a [`Session`] on a dedicated worker thread.
pub struct SessionQueue<S> {
    sender: Option<Sender<SessionEvent>>,
    tick_pending: Arc<AtomicBool>,
    worker: Option<JoinHandle<Session<S>>>,
}

impl<S> SessionQueue<S>
where
    S: WorldSensing + Send + Sync + 'static,
{
    /// Move `session` onto a new worker thread and return the queue.
    pub fn spawn(session: Session<S>) -> Result<Self> {
        let (sender, receiver) = mpsc::channel::<SessionEvent>();
        let tick_pending = Arc::new(AtomicBool::new(false));
        let pending = Arc::clone(&tick_pending);

        let worker = thread::Builder::new()
            .name("arplace-session".into())
            .spawn(move || {
                let mut session = session;
                while let Ok(event) = receiver.recv() {
                    let is_tick = matches!(event, SessionEvent::FrameTick);
                    session.handle_event(event);
                    if is_tick {
                        pending.store(false, Ordering::Release);
                    }
                }
                session
            })
            .context("failed to spawn session worker")?;

        Ok(Self {
            sender: Some(sender),
            tick_pending,
            worker: Some(worker),
        })
    }

    /// A clonable posting handle usable from other threads.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            // The sender is only None after shutdown consumed self.
            sender: self.sender.as_ref().expect("queue already shut down").clone(),
            tick_pending: Arc::clone(&self.tick_pending),
        }
    }

    /// Post an event onto the serial queue.
    pub fn post(&self, event: SessionEvent) -> Result<()> {
        self.handle().post(event)
    }

    /// Post a coalescing frame tick (see [`SessionHandle::post_frame_tick`]).
    pub fn post_frame_tick(&self) -> Result<bool> {
        self.handle().post_frame_tick()
    }

    /// Drain the queue, stop the worker, and hand the session back.
    pub fn shutdown(mut self) -> Result<Session<S>> {
        drop(self.sender.take());
        let worker = self
            .worker
            .take()
            .ok_or_else(|| anyhow!("session queue already shut down"))?;
        worker
            .join()
            .map_err(|_| anyhow!("session worker panicked"))
    }
}

impl<S> Drop for SessionQueue<S> {
    fn drop(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

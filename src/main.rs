//! arplace - headless demo of surface-anchored object placement
//!
//! Runs a scripted interaction session against a synthetic floor sensor:
//! surface detection, tap-select, a threshold-gated drag driven by
//! render-loop ticks, rotation, and snap correction after surface drift.

mod config;
mod sim;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arplace_core::{Alignment, AnchorId, SurfaceAnchor};
use arplace_interaction::{Gesture, GesturePhase, Session, SessionEvent, SessionQueue, WorldSensing};
use config::DemoConfig;
use glam::{Mat4, Vec2, Vec3};
use sim::JitteredFloorSensor;
use tracing::info;

/// Command-line options (parsed by hand; the surface is tiny).
struct CliOptions {
    config: Option<PathBuf>,
}

impl CliOptions {
    fn parse(args: impl Iterator<Item = String>) -> Result<Self> {
        let mut options = CliOptions { config: None };
        let mut args = args;
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args.next().context("--config requires a path")?;
                    options.config = Some(PathBuf::from(path));
                }
                other => anyhow::bail!("unknown argument: {other}"),
            }
        }
        Ok(options)
    }
}

fn main() -> Result<()> {
    // INFO by default; override via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting arplace demo v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1))?;
    let cfg = match cli.config {
        Some(path) => DemoConfig::load_from_path(&path),
        None => DemoConfig::load(),
    };

    run_demo(&cfg)
}

fn run_demo(cfg: &DemoConfig) -> Result<()> {
    let sensor = Arc::new(JitteredFloorSensor::new(cfg));
    let mut session = Session::new(Arc::clone(&sensor), cfg.screen_center());
    session.controller_mut().translate_assuming_infinite_plane = cfg.infinite_plane_drag;

    // The sensing stack reports a 2 m x 2 m floor patch at world origin.
    let floor = SurfaceAnchor::new(
        AnchorId(1),
        Alignment::Horizontal,
        Vec3::ZERO,
        Vec2::new(2.0, 2.0),
        Mat4::IDENTITY,
    );
    sensor.detect_surface(floor.clone());
    session.handle_event(SessionEvent::SurfaceAdded(floor));

    let object = session
        .primary_object()
        .context("surface detection created no object")?;
    let node = session
        .primary_node()
        .context("primary object has no scene node")?;
    log_object_state(&session, "placed on first surface");

    // Register the object for picking where it currently appears on screen.
    let object_screen = {
        let position = session.scene().object(object).context("object missing")?.position();
        sensor.project_point(position)
    };
    sensor.track_node(object_screen, 60.0, node);

    // Tap on the object: selects it without moving anything.
    session.handle_event(SessionEvent::Gesture(Gesture::Tap {
        location: object_screen,
    }));
    info!(tracked = ?session.controller().tracked_object(), "tap selected object");

    // Threshold-gated drag: begin over the object, wiggle below the
    // threshold, then pull right while render ticks re-resolve the point.
    session.handle_event(SessionEvent::Gesture(Gesture::Pan {
        phase: GesturePhase::Began,
        translation: Vec2::ZERO,
        locations: vec![object_screen],
        threshold_exceeded: false,
    }));
    session.handle_event(SessionEvent::Gesture(Gesture::Pan {
        phase: GesturePhase::Changed,
        translation: Vec2::new(2.0, 0.0),
        locations: vec![object_screen],
        threshold_exceeded: false,
    }));
    for step in 0..cfg.ticks_per_step {
        session.handle_event(SessionEvent::Gesture(Gesture::Pan {
            phase: GesturePhase::Changed,
            translation: Vec2::new(20.0, 0.0),
            locations: vec![object_screen + Vec2::new(20.0 * step as f32, 0.0)],
            threshold_exceeded: true,
        }));
        // The device drifts too; ticks keep the object under the finger.
        sensor.move_camera(Vec3::new(0.005, 0.0, 0.0));
        session.handle_event(SessionEvent::FrameTick);
    }
    session.handle_event(SessionEvent::Gesture(Gesture::Pan {
        phase: GesturePhase::Ended,
        translation: Vec2::ZERO,
        locations: Vec::new(),
        threshold_exceeded: true,
    }));
    log_object_state(&session, "after drag");

    // Two-finger rotation; select again first since the drag cleared it.
    session.handle_event(SessionEvent::Gesture(Gesture::Tap {
        location: object_screen,
    }));
    session.handle_event(SessionEvent::Gesture(Gesture::Rotate {
        phase: GesturePhase::Changed,
        delta: -0.35,
    }));
    log_object_state(&session, "after rotation");

    // The floor estimate grows as the device scans and drifts 2 cm upward;
    // snap pulls the object flush onto the refreshed surface.
    let drifted = SurfaceAnchor::new(
        AnchorId(1),
        Alignment::Horizontal,
        Vec3::ZERO,
        Vec2::new(4.0, 4.0),
        Mat4::from_translation(Vec3::new(0.0, 0.02, 0.0)),
    );
    sensor.detect_surface(drifted.clone());
    session.handle_event(SessionEvent::SurfaceUpdated(drifted));
    log_object_state(&session, "after surface drift + snap");

    // Hand the session to its serial queue and let a render-loop thread
    // fire ticks at it; bursts coalesce instead of piling up.
    let queue = SessionQueue::spawn(session)?;
    let handle = queue.handle();
    let render_loop = std::thread::spawn(move || {
        let mut accepted = 0u32;
        for _ in 0..120 {
            if handle.post_frame_tick().unwrap_or(false) {
                accepted += 1;
            }
        }
        accepted
    });
    let accepted = render_loop
        .join()
        .map_err(|_| anyhow::anyhow!("render loop thread panicked"))?;
    info!(accepted, burst = 120, "frame ticks accepted from burst");

    let session = queue.shutdown()?;
    log_object_state(&session, "final");
    Ok(())
}

fn log_object_state(session: &Session<JitteredFloorSensor>, stage: &str) {
    let Some(id) = session.primary_object() else {
        return;
    };
    let Some(object) = session.scene().object(id) else {
        return;
    };
    let commits = session
        .scene()
        .committed_anchor(id)
        .map(|commit| commit.count)
        .unwrap_or(0);
    info!(
        stage,
        position = ?object.position(),
        yaw = object.yaw(),
        alignment = ?object.current_alignment(),
        commits,
        "object state"
    );
}

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

const DEFAULT_CONFIG_PATH: &str = "config/demo.toml";

/// Settings for the headless demo session.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Simulated screen width in pixels.
    pub screen_width: f32,
    /// Simulated screen height in pixels.
    pub screen_height: f32,
    /// Screen pixels per world unit in the synthetic top-down projection.
    pub pixels_per_unit: f32,
    /// Amplitude of the depth noise added to estimated (un-anchored) hits,
    /// in world units.
    pub depth_jitter: f32,
    /// Render-loop ticks simulated per drag step.
    pub ticks_per_step: u32,
    /// Translate drags assuming detected planes extend infinitely.
    pub infinite_plane_drag: bool,
    /// Seed for the demo's noise source, for reproducible runs.
    pub noise_seed: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            screen_width: 800.0,
            screen_height: 600.0,
            pixels_per_unit: 100.0,
            // Rough magnitude of real hit-test depth noise at arm's length.
            depth_jitter: 0.03,
            ticks_per_step: 8,
            infinite_plane_drag: true,
            noise_seed: 7,
        }
    }
}

impl DemoConfig {
    /// Load the demo configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on
    /// errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<DemoConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    DemoConfig::default()
                }
            },
            Err(_) => DemoConfig::default(),
        }
    }

    /// Screen center, where the first object gets placed.
    pub fn screen_center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.screen_width / 2.0, self.screen_height / 2.0)
    }
}

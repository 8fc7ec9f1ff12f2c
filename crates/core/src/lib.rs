#![warn(missing_docs)]
//! Shared geometry vocabulary for surface-anchored object placement.
//!
//! Defines detected-surface descriptions ([`SurfaceAnchor`]), the
//! horizontal/vertical [`Alignment`] classification, and the small pieces of
//! transform math (yaw normalization, `Mat4` translation access) the rest of
//! the workspace builds on.

mod anchor;
mod math;

pub use anchor::{AnchorError, AnchorId, SurfaceAnchor};
pub use math::{normalize_yaw, translation, with_translation};

use serde::{Deserialize, Serialize};

/// Orientation class of a detected planar surface.
///
/// Placement logic only distinguishes floors/tables from walls; slanted
/// surfaces are not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alignment {
    /// Surface normal points up (floor, table top).
    Horizontal,
    /// Surface normal is horizontal (wall).
    Vertical,
}

/// A point on the 2D screen, in view coordinates.
pub type ScreenPoint = glam::Vec2;

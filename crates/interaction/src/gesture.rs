//! Typed gesture events produced by the external recognizer collaborator.

use arplace_core::ScreenPoint;
use glam::Vec2;

/// Lifecycle phase of a continuous gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    /// Touches went down and the gesture was recognized.
    Began,
    /// The gesture moved; deltas are cumulative since the previous event.
    Changed,
    /// Touches lifted normally.
    Ended,
    /// The recognizer gave up (interruption, too many touches, ...).
    Cancelled,
}

impl GesturePhase {
    /// Whether this phase terminates the gesture.
    pub fn is_terminal(self) -> bool {
        matches!(self, GesturePhase::Ended | GesturePhase::Cancelled)
    }
}

/// A gesture event. The recognizer implementation is an external
/// collaborator; this crate only consumes its typed output.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// One-or-more-finger drag.
    Pan {
        /// Gesture lifecycle phase.
        phase: GesturePhase,
        /// Screen translation since the previous event.
        translation: Vec2,
        /// Current touch locations on screen.
        locations: Vec<ScreenPoint>,
        /// Whether the recognizer's displacement threshold has been
        /// exceeded. Threshold detection belongs to the recognizer, not to
        /// the controller.
        threshold_exceeded: bool,
    },
    /// Two-finger rotation.
    Rotate {
        /// Gesture lifecycle phase.
        phase: GesturePhase,
        /// Rotation in radians since the previous event.
        delta: f32,
    },
    /// Single tap.
    Tap {
        /// Tap location on screen.
        location: ScreenPoint,
    },
}

/// Midpoint of the bounding rectangle of a set of touch locations.
///
/// Used as the last-resort pick location when no individual touch sits over
/// an object.
pub fn centroid(locations: &[ScreenPoint]) -> Option<ScreenPoint> {
    let first = *locations.first()?;
    let (min, max) = locations
        .iter()
        .fold((first, first), |(min, max), &p| (min.min(p), max.max(p)));
    Some((min + max) / 2.0)
}

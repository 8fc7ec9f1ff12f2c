//! Scoped animated transform updates.
//!
//! Transform and rotation writes that should reach the renderer as one
//! animated step are grouped in a [`TransformTransaction`]. The guard commits
//! on drop, so every exit path of the surrounding code (early returns
//! included) ends the transaction.

use std::ops::{Deref, DerefMut};

use crate::PlacedObject;

/// Interpolation curve for an animated transform change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    /// Constant-rate interpolation.
    Linear,
    /// Slow start and finish (used for snap-onto-surface descents).
    EaseInOut,
}

/// Descriptor of the animation covering the last committed transform change.
///
/// Purely descriptive: no clock is modeled here. A renderer consuming the
/// object would interpolate toward the committed transform over `duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animation {
    /// Animation length in time units. Zero means "apply instantly".
    pub duration: f32,
    /// Interpolation curve.
    pub easing: Easing,
}

/// RAII guard grouping transform mutations into one animated commit.
///
/// Derefs to the object so mutations read naturally; dropping the guard
/// records the animation descriptor (or clears it for instant updates).
pub(crate) struct TransformTransaction<'a> {
    object: &'a mut PlacedObject,
    animation: Animation,
}

impl<'a> TransformTransaction<'a> {
    pub(crate) fn new(object: &'a mut PlacedObject, duration: f32, easing: Easing) -> Self {
        Self {
            object,
            animation: Animation { duration, easing },
        }
    }
}

impl Deref for TransformTransaction<'_> {
    type Target = PlacedObject;

    fn deref(&self) -> &PlacedObject {
        self.object
    }
}

impl DerefMut for TransformTransaction<'_> {
    fn deref_mut(&mut self) -> &mut PlacedObject {
        self.object
    }
}

impl Drop for TransformTransaction<'_> {
    fn drop(&mut self) {
        self.object.animation = if self.animation.duration > 0.0 {
            Some(self.animation)
        } else {
            None
        };
    }
}

#![warn(missing_docs)]
//! Gesture-to-world interaction for placed virtual objects.
//!
//! The [`InteractionController`] consumes typed gesture events, resolves
//! screen points to world space through an external [`WorldSensing`]
//! collaborator, and drives `arplace-object` transform updates. A
//! [`Session`] serializes gestures, surface-detection events, and per-frame
//! ticks onto a single logical owner; [`SessionQueue`] runs that owner on a
//! dedicated worker thread with coalescing frame ticks.

mod controller;
mod gesture;
mod scene;
mod sensor;
mod session;

pub use controller::InteractionController;
pub use gesture::{centroid, Gesture, GesturePhase};
pub use scene::{AnchorCommit, NodeId, ObjectId, Scene};
pub use sensor::{HitKind, HitResult, WorldSensing};
pub use session::{Session, SessionEvent, SessionHandle, SessionQueue};

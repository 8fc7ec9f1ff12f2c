//! Bounded window of recent camera-to-object distances.

use std::collections::VecDeque;

/// How many recent distance samples are kept for smoothing.
pub const DISTANCE_WINDOW_CAPACITY: usize = 10;

/// FIFO window over the most recent distance samples.
///
/// Raw hit-test depth is the noisiest part of a placement result; averaging
/// the last few camera-to-object distances suppresses that jitter without
/// touching lateral motion.
#[derive(Debug, Clone, Default)]
pub struct DistanceWindow {
    samples: VecDeque<f32>,
}

impl DistanceWindow {
    /// Create an empty window.
    pub fn new() -> Self {
        Self {
            samples: VecDeque::with_capacity(DISTANCE_WINDOW_CAPACITY),
        }
    }

    /// Push a sample, evicting the oldest once the window is full.
    pub fn push(&mut self, distance: f32) {
        if self.samples.len() == DISTANCE_WINDOW_CAPACITY {
            self.samples.pop_front();
        }
        self.samples.push_back(distance);
    }

    /// Arithmetic mean of the window, or `None` while empty.
    pub fn average(&self) -> Option<f32> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f32 = self.samples.iter().sum();
        Some(sum / self.samples.len() as f32)
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the window holds no samples yet.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in arrival order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().copied()
    }
}

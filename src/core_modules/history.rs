// THEORY:
// The `history` module gives the engine its short-term memory. A single frame
// can say where the body is but never whether it is moving, so the classifier
// keeps two sliding windows of recent samples: the nose position (whole-body
// motion) and the wrist pair (waving).
//
// Key architectural principles:
// 1.  **Bounded**: Every window has a fixed capacity. Appending to a full window
//     evicts the oldest sample, so memory and per-frame work never grow.
// 2.  **Chronological**: Samples are stored oldest to newest and every read
//     preserves that order. Detectors rely on it to compute frame-to-frame deltas.
// 3.  **Forgiving reads**: Asking for more samples than exist returns what there
//     is. Deciding whether a window is long enough is the detector's job.

use std::collections::VecDeque;

use crate::config::MotionConfig;
use crate::core_modules::geometry::geometry::Point;

/// A fixed-capacity FIFO window of samples.
#[derive(Debug, Clone, PartialEq)]
pub struct History<T> {
    samples: VecDeque<T>,
    capacity: usize,
}

impl<T> History<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds the newest sample, evicting the oldest once the window is full.
    pub fn append(&mut self, sample: T) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// The last `n` samples, oldest first. Yields fewer when the window is shorter.
    pub fn recent(&self, n: usize) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.samples.iter().skip(self.samples.len().saturating_sub(n))
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Both wrist positions captured in the same frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WristPair {
    pub left: Point,
    pub right: Point,
}

/// The two windows the classifier consults: nose positions and wrist pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionHistory {
    pub positions: History<Point>,
    pub wrists: History<WristPair>,
}

impl MotionHistory {
    pub fn new(config: &MotionConfig) -> Self {
        Self {
            positions: History::new(config.position_capacity),
            wrists: History::new(config.wrist_capacity),
        }
    }

    /// Records one accepted frame in both windows.
    pub fn record(&mut self, nose: Point, wrists: WristPair) {
        self.positions.append(nose);
        self.wrists.append(wrists);
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.wrists.clear();
    }
}

impl Default for MotionHistory {
    fn default() -> Self {
        Self::new(&MotionConfig::default())
    }
}

// THEORY:
// The `timeline` module turns the per-frame stream of labels into a narrative:
// a list of segments, each a run of consecutive frames that share one label.
// It is purely a record for hosts and diagnostics. The classifier never reads
// it back, so keeping a timeline does not give the engine hysteresis.

use serde::Serialize;

use crate::core_modules::activity::ActivityLabel;

/// A run of consecutive frames that received the same label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivitySegment {
    pub label: ActivityLabel,
    pub start_frame: u64,
    /// Inclusive.
    pub end_frame: u64,
}

impl ActivitySegment {
    fn new(label: ActivityLabel, frame: u64) -> Self {
        Self {
            label,
            start_frame: frame,
            end_frame: frame,
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.end_frame - self.start_frame + 1
    }
}

#[derive(Debug, Default)]
pub struct ActivityTimeline {
    active: Option<ActivitySegment>,
    completed: Vec<ActivitySegment>,
    frame_count: u64,
}

impl ActivityTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the label for the next frame. Returns the segment that just
    /// closed when the label differs from the previous frame's.
    pub fn record(&mut self, label: ActivityLabel) -> Option<ActivitySegment> {
        let frame = self.frame_count;
        self.frame_count += 1;

        if let Some(segment) = self.active.as_mut().filter(|segment| segment.label == label) {
            segment.end_frame = frame;
            return None;
        }

        let closed = self.active.replace(ActivitySegment::new(label, frame));
        if let Some(segment) = closed {
            self.completed.push(segment);
        }
        closed
    }

    pub fn current(&self) -> Option<&ActivitySegment> {
        self.active.as_ref()
    }

    pub fn completed(&self) -> &[ActivitySegment] {
        &self.completed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Closes the active segment and returns every segment in order.
    pub fn finish(mut self) -> Vec<ActivitySegment> {
        if let Some(segment) = self.active.take() {
            self.completed.push(segment);
        }
        self.completed
    }
}

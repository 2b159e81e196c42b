// THEORY:
// The `pipeline` module is the top-level API of the classification engine. It
// wires the layers together for a single frame:
//
//   Frame -> Pose (gate) -> MotionHistory (append) -> PostureFeatures -> rules -> label
//
// The decision itself is a pure function of the frame and a history snapshot
// (`classify_frame`). `ActivityClassifier` is the convenience owner of that
// history for hosts that process one capture stream. Each classifier must see
// its frames strictly in order; streams running in parallel need one
// classifier each.

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::ClassifierConfig;
use crate::core_modules::activity::ActivityLabel;
use crate::core_modules::history::MotionHistory;
use crate::core_modules::keypoint::Frame;
use crate::core_modules::motion::{is_moving, is_waving};
use crate::core_modules::posture::{Pose, PostureFeatures, RuleContext, evaluate};

/// The label for one frame plus the evidence behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActivityReport {
    pub label: ActivityLabel,
    /// `None` when the frame was rejected for a missing or low-confidence keypoint.
    pub features: Option<PostureFeatures>,
    pub moving: bool,
    pub waving: bool,
}

impl ActivityReport {
    fn rejected() -> Self {
        Self {
            label: ActivityLabel::Stable,
            features: None,
            moving: false,
            waving: false,
        }
    }
}

/// Classifies `frame` against an immutable history snapshot and returns the
/// label together with the updated history. The input snapshot is untouched.
pub fn classify_frame(
    frame: &Frame,
    history: &MotionHistory,
    config: &ClassifierConfig,
) -> (ActivityLabel, MotionHistory) {
    let mut next = history.clone();
    let report = analyze(frame, &mut next, config);
    (report.label, next)
}

/// Core of every entry point. Appends to `history` only when the frame passes
/// the keypoint gate, and always before the rules run.
fn analyze(frame: &Frame, history: &mut MotionHistory, config: &ClassifierConfig) -> ActivityReport {
    let pose = match Pose::from_frame(frame, config.min_keypoint_score) {
        Ok(pose) => pose,
        Err(missing) => {
            debug!(keypoint = %missing, "frame rejected, keypoint missing or below score threshold");
            return ActivityReport::rejected();
        }
    };

    history.record(pose.nose, pose.wrists());

    let features = PostureFeatures::from_pose(&pose);
    let context = RuleContext {
        pose: &pose,
        features: &features,
        history: &*history,
        config,
    };
    let label = evaluate(&context);

    let report = ActivityReport {
        label,
        features: Some(features),
        moving: is_moving(&history.positions, &config.motion),
        waving: is_waving(&history.wrists, &config.motion),
    };
    trace!(?report, "frame classified");
    report
}

/// Owns the motion history for one capture stream.
#[derive(Debug, Clone)]
pub struct ActivityClassifier {
    config: ClassifierConfig,
    history: MotionHistory,
}

impl ActivityClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let history = MotionHistory::new(&config.motion);
        Self { config, history }
    }

    /// Labels the frame and, if it carried every required keypoint, records it
    /// in the motion history.
    pub fn classify(&mut self, frame: &Frame) -> ActivityLabel {
        self.classify_detailed(frame).label
    }

    pub fn classify_detailed(&mut self, frame: &Frame) -> ActivityReport {
        analyze(frame, &mut self.history, &self.config)
    }

    pub fn reset_history(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &MotionHistory {
        &self.history
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

impl Default for ActivityClassifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

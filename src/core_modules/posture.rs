// THEORY:
// The `posture` module is the decision layer of the engine. It takes one usable
// frame, reduces it to a handful of geometric features, and walks an ordered
// table of rules until one matches.
//
// Key architectural principles:
// 1.  **Resolve once**: `Pose::from_frame` checks that every landmark the rules
//     read is present and confident. Past that point no rule has to deal with a
//     missing joint.
// 2.  **Features, then rules**: Joint angles, segment lengths and body ratios
//     are computed in one place (`PostureFeatures`). Rules only compare numbers.
// 3.  **Priority as data**: `POSTURE_RULES` is an ordered list of
//     `(label, predicate)` pairs. Several postures can hold at once (raised hands
//     while standing straight); the first entry wins and the rest are not
//     evaluated. Reordering behaviour means reordering this table.
// 4.  **Memoryless**: Rules read the motion windows but never the previous
//     label. There is no hysteresis.

use serde::Serialize;

use crate::config::ClassifierConfig;
use crate::core_modules::activity::ActivityLabel;
use crate::core_modules::geometry::geometry::{Point, angle_degrees, distance};
use crate::core_modules::history::{MotionHistory, WristPair};
use crate::core_modules::keypoint::{Frame, KeypointName};
use crate::core_modules::motion::{is_moving, is_waving};

/// The 13 landmarks the rules read, all present and above the score threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub nose: Point,
    pub left_shoulder: Point,
    pub right_shoulder: Point,
    pub left_elbow: Point,
    pub right_elbow: Point,
    pub left_wrist: Point,
    pub right_wrist: Point,
    pub left_hip: Point,
    pub right_hip: Point,
    pub left_knee: Point,
    pub right_knee: Point,
    pub left_ankle: Point,
    pub right_ankle: Point,
}

impl Pose {
    /// Resolves the required landmarks, or names the first one that is missing
    /// or scored below `min_score`.
    pub fn from_frame(frame: &Frame, min_score: f64) -> Result<Self, KeypointName> {
        let get = |name: KeypointName| frame.usable(name, min_score).ok_or(name);

        Ok(Self {
            nose: get(KeypointName::Nose)?,
            left_shoulder: get(KeypointName::LeftShoulder)?,
            right_shoulder: get(KeypointName::RightShoulder)?,
            left_elbow: get(KeypointName::LeftElbow)?,
            right_elbow: get(KeypointName::RightElbow)?,
            left_wrist: get(KeypointName::LeftWrist)?,
            right_wrist: get(KeypointName::RightWrist)?,
            left_hip: get(KeypointName::LeftHip)?,
            right_hip: get(KeypointName::RightHip)?,
            left_knee: get(KeypointName::LeftKnee)?,
            right_knee: get(KeypointName::RightKnee)?,
            left_ankle: get(KeypointName::LeftAnkle)?,
            right_ankle: get(KeypointName::RightAnkle)?,
        })
    }

    pub fn wrists(&self) -> WristPair {
        WristPair {
            left: self.left_wrist,
            right: self.right_wrist,
        }
    }
}

/// Geometric summary of one pose. Angles in degrees, lengths in input units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PostureFeatures {
    pub left_knee_angle: f64,
    pub right_knee_angle: f64,
    pub left_hip_angle: f64,
    pub right_hip_angle: f64,
    /// Mean of the left and right shoulder-to-hip segments.
    pub shoulder_hip_dist: f64,
    pub hip_knee_dist: f64,
    pub knee_ankle_dist: f64,
    pub total_height: f64,
    pub shoulder_hip_ratio: f64,
    pub hip_knee_ratio: f64,
}

impl PostureFeatures {
    pub fn from_pose(pose: &Pose) -> Self {
        let shoulder_hip_dist =
            (distance(pose.left_shoulder, pose.left_hip) + distance(pose.right_shoulder, pose.right_hip)) / 2.0;
        let hip_knee_dist = (distance(pose.left_hip, pose.left_knee) + distance(pose.right_hip, pose.right_knee)) / 2.0;
        let knee_ankle_dist =
            (distance(pose.left_knee, pose.left_ankle) + distance(pose.right_knee, pose.right_ankle)) / 2.0;
        let total_height = shoulder_hip_dist + hip_knee_dist + knee_ankle_dist;

        // Collapsed skeletons (all joints coincident) have no meaningful proportions.
        let (shoulder_hip_ratio, hip_knee_ratio) = if total_height > 0.0 {
            (shoulder_hip_dist / total_height, hip_knee_dist / total_height)
        } else {
            (0.0, 0.0)
        };

        Self {
            left_knee_angle: angle_degrees(pose.left_hip, pose.left_knee, pose.left_ankle),
            right_knee_angle: angle_degrees(pose.right_hip, pose.right_knee, pose.right_ankle),
            left_hip_angle: angle_degrees(pose.left_shoulder, pose.left_hip, pose.left_knee),
            right_hip_angle: angle_degrees(pose.right_shoulder, pose.right_hip, pose.right_knee),
            shoulder_hip_dist,
            hip_knee_dist,
            knee_ankle_dist,
            total_height,
            shoulder_hip_ratio,
            hip_knee_ratio,
        }
    }
}

/// Everything a rule may look at for the current frame.
pub struct RuleContext<'a> {
    pub pose: &'a Pose,
    pub features: &'a PostureFeatures,
    pub history: &'a MotionHistory,
    pub config: &'a ClassifierConfig,
}

/// One entry of the priority table.
#[derive(Clone, Copy)]
pub struct PostureRule {
    pub label: ActivityLabel,
    pub matches: fn(&RuleContext<'_>) -> bool,
}

impl std::fmt::Debug for PostureRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostureRule").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Rules in priority order. `Stable` is not listed: it is what remains.
pub const POSTURE_RULES: [PostureRule; 6] = [
    PostureRule {
        label: ActivityLabel::RaisingHands,
        matches: raising_hands,
    },
    PostureRule {
        label: ActivityLabel::Waving,
        matches: waving,
    },
    PostureRule {
        label: ActivityLabel::Squatting,
        matches: squatting,
    },
    PostureRule {
        label: ActivityLabel::Sitting,
        matches: sitting,
    },
    PostureRule {
        label: ActivityLabel::Movement,
        matches: movement,
    },
    PostureRule {
        label: ActivityLabel::Standing,
        matches: standing,
    },
];

/// The label of the first matching rule, or `Stable`.
pub fn evaluate(context: &RuleContext<'_>) -> ActivityLabel {
    POSTURE_RULES
        .iter()
        .find(|rule| (rule.matches)(context))
        .map(|rule| rule.label)
        .unwrap_or_default()
}

fn level(a: Point, b: Point, tolerance: f64) -> bool {
    (a.y - b.y).abs() < tolerance
}

fn raising_hands(ctx: &RuleContext<'_>) -> bool {
    let margin = ctx.config.posture.raise_margin;
    let pose = ctx.pose;
    pose.left_shoulder.y - pose.left_wrist.y >= margin && pose.right_shoulder.y - pose.right_wrist.y >= margin
}

fn waving(ctx: &RuleContext<'_>) -> bool {
    is_waving(&ctx.history.wrists, &ctx.config.motion)
}

fn squatting(ctx: &RuleContext<'_>) -> bool {
    let t = &ctx.config.posture;
    let f = ctx.features;
    let pose = ctx.pose;
    let shoulder_mid = pose.left_shoulder.midpoint(&pose.right_shoulder);

    f.left_knee_angle < t.squat_knee_max
        && f.right_knee_angle < t.squat_knee_max
        && f.left_hip_angle > t.squat_hip_min
        && f.right_hip_angle > t.squat_hip_min
        && level(pose.left_shoulder, pose.right_shoulder, t.level_tolerance)
        && pose.nose.y < shoulder_mid.y
}

fn sitting(ctx: &RuleContext<'_>) -> bool {
    let t = &ctx.config.posture;
    let f = ctx.features;
    let pose = ctx.pose;

    // A seated hip drops to roughly knee height; it may sit lower, never far above.
    let hip_near_knee = |hip: Point, knee: Point| knee.y - hip.y < t.sit_hip_knee_tolerance;

    f.left_knee_angle < t.sit_knee_max
        && f.right_knee_angle < t.sit_knee_max
        && hip_near_knee(pose.left_hip, pose.left_knee)
        && hip_near_knee(pose.right_hip, pose.right_knee)
        && f.shoulder_hip_ratio < t.sit_shoulder_hip_ratio_max
        && f.hip_knee_ratio > t.sit_hip_knee_ratio_min
}

fn movement(ctx: &RuleContext<'_>) -> bool {
    is_moving(&ctx.history.positions, &ctx.config.motion)
}

fn standing(ctx: &RuleContext<'_>) -> bool {
    let t = &ctx.config.posture;
    let f = ctx.features;
    let pose = ctx.pose;

    f.left_knee_angle > t.stand_knee_min
        && f.right_knee_angle > t.stand_knee_min
        && level(pose.left_shoulder, pose.right_shoulder, t.level_tolerance)
        && level(pose.left_hip, pose.right_hip, t.level_tolerance)
        && level(pose.left_knee, pose.right_knee, t.level_tolerance)
        && f.shoulder_hip_ratio > t.stand_shoulder_hip_ratio_min
        && f.hip_knee_ratio > t.stand_hip_knee_ratio_min
}

// THEORY:
// The `keypoint` module is the boundary between the external pose detector and
// the engine. A `Frame` is a "dumb" container of named landmarks for a single
// instant; it carries no history and performs no analysis. Detectors disagree
// about which landmarks they emit and how they package them, so decoding is
// lenient: unknown names are ignored and both a bare array and an object with a
// `keypoints` field are accepted.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core_modules::geometry::geometry::Point;
use crate::error::Result;

/// The 17 landmarks of the COCO body layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeypointName {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl KeypointName {
    pub const ALL: [KeypointName; 17] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    /// Landmarks the posture rules read. Eyes and ears are never consulted.
    pub const REQUIRED: [KeypointName; 13] = [
        Self::Nose,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for KeypointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeypointName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| format!("unknown keypoint name: {s}"))
    }
}

/// One landmark as reported by the pose detector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub name: KeypointName,
    pub x: f64,
    pub y: f64,
    /// Detector confidence in `[0, 1]`.
    pub score: f64,
}

impl Keypoint {
    pub fn new(name: KeypointName, x: f64, y: f64, score: f64) -> Self {
        Self { name, x, y, score }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Wire shape of a keypoint before its name is resolved.
#[derive(Deserialize)]
struct RawKeypoint {
    name: String,
    x: f64,
    y: f64,
    /// Detectors that do not report confidence are taken at face value.
    #[serde(default = "full_confidence")]
    score: f64,
}

fn full_confidence() -> f64 {
    1.0
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFrame {
    Wrapped { keypoints: Vec<RawKeypoint> },
    Bare(Vec<RawKeypoint>),
}

/// All landmarks detected at one instant, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    keypoints: HashMap<KeypointName, Keypoint>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the landmark with the same name.
    pub fn insert(&mut self, keypoint: Keypoint) {
        self.keypoints.insert(keypoint.name, keypoint);
    }

    pub fn with(mut self, keypoint: Keypoint) -> Self {
        self.insert(keypoint);
        self
    }

    pub fn remove(&mut self, name: KeypointName) -> Option<Keypoint> {
        self.keypoints.remove(&name)
    }

    pub fn get(&self, name: KeypointName) -> Option<&Keypoint> {
        self.keypoints.get(&name)
    }

    /// The landmark's position if it is present and scored at least `min_score`.
    pub fn usable(&self, name: KeypointName, min_score: f64) -> Option<Point> {
        self.get(name)
            .filter(|kp| kp.score >= min_score)
            .map(Keypoint::position)
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keypoint> {
        self.keypoints.values()
    }

    /// Decodes a frame from detector JSON, either `[{name, x, y, score}, ...]`
    /// or `{"keypoints": [...]}`. Landmarks with unrecognised names are dropped.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawFrame = serde_json::from_str(json)?;
        let keypoints = match raw {
            RawFrame::Wrapped { keypoints } | RawFrame::Bare(keypoints) => keypoints,
        };

        let mut frame = Frame::new();
        for raw in keypoints {
            match raw.name.parse::<KeypointName>() {
                Ok(name) => frame.insert(Keypoint::new(name, raw.x, raw.y, raw.score)),
                Err(reason) => tracing::trace!(%reason, "ignoring keypoint"),
            }
        }
        Ok(frame)
    }
}

impl FromIterator<Keypoint> for Frame {
    fn from_iter<I: IntoIterator<Item = Keypoint>>(iter: I) -> Self {
        let mut frame = Frame::new();
        for keypoint in iter {
            frame.insert(keypoint);
        }
        frame
    }
}

// THEORY:
// The `config` module holds every number the engine compares against. The rules
// in `posture` and `motion` carry no literals of their own; they read them from
// `ClassifierConfig`, whose defaults are the calibrated values for a webcam feed.
//
// Configs come from TOML files where any field may be omitted. Loading always
// validates, so a classifier is never built from thresholds that could not
// match (a detector window longer than its history, a score outside [0, 1]).
// `StreamConfig` is separate because it tunes the host-side driver, not the
// decision.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ActivityError, Result};

/// Tunable thresholds for the classifier. The defaults are calibrated for a
/// webcam feed in pixel coordinates; other resolutions or camera distances
/// need their own values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Keypoints scoring below this are treated as missing.
    pub min_keypoint_score: f64,
    pub motion: MotionConfig,
    pub posture: PostureThresholds,
}

/// Window sizes and thresholds for the motion detectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Capacity of the nose position history.
    pub position_capacity: usize,
    /// Capacity of the wrist pair history.
    pub wrist_capacity: usize,
    /// Number of recent positions averaged by the movement detector.
    pub moving_window: usize,
    /// Average per-frame displacement above which the body is moving.
    pub moving_threshold: f64,
    /// Number of recent wrist pairs inspected by the waving detector.
    pub waving_window: usize,
    /// Average per-frame horizontal wrist travel above which a hand may be waving.
    pub waving_threshold: f64,
    /// How many times horizontal travel must exceed vertical travel.
    pub waving_dominance: f64,
}

/// Geometric thresholds for the posture rules. Distances are in input
/// coordinate units, angles in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureThresholds {
    pub raise_margin: f64,
    pub level_tolerance: f64,
    pub squat_knee_max: f64,
    pub squat_hip_min: f64,
    pub sit_knee_max: f64,
    pub sit_hip_knee_tolerance: f64,
    pub sit_shoulder_hip_ratio_max: f64,
    pub sit_hip_knee_ratio_min: f64,
    pub stand_knee_min: f64,
    pub stand_shoulder_hip_ratio_min: f64,
    pub stand_hip_knee_ratio_min: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_keypoint_score: 0.3,
            motion: MotionConfig::default(),
            posture: PostureThresholds::default(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            position_capacity: 10,
            wrist_capacity: 20,
            moving_window: 5,
            moving_threshold: 15.0,
            waving_window: 10,
            waving_threshold: 20.0,
            waving_dominance: 2.0,
        }
    }
}

impl Default for PostureThresholds {
    fn default() -> Self {
        Self {
            raise_margin: 50.0,
            level_tolerance: 30.0,
            squat_knee_max: 100.0,
            squat_hip_min: 45.0,
            sit_knee_max: 120.0,
            sit_hip_knee_tolerance: 20.0,
            sit_shoulder_hip_ratio_max: 0.4,
            sit_hip_knee_ratio_min: 0.3,
            stand_knee_min: 160.0,
            stand_shoulder_hip_ratio_min: 0.3,
            stand_hip_knee_ratio_min: 0.3,
        }
    }
}

impl ClassifierConfig {
    /// Reads and validates a TOML config file. Missing fields take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ActivityError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ActivityError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_keypoint_score) {
            return Err(invalid(format!(
                "min_keypoint_score must be within [0, 1], got {}",
                self.min_keypoint_score
            )));
        }

        let motion = &self.motion;
        if motion.moving_window < 2 {
            return Err(invalid("moving_window must be at least 2".into()));
        }
        if motion.waving_window < 2 {
            return Err(invalid("waving_window must be at least 2".into()));
        }
        if motion.position_capacity < motion.moving_window {
            return Err(invalid(format!(
                "position_capacity ({}) is smaller than moving_window ({})",
                motion.position_capacity, motion.moving_window
            )));
        }
        if motion.wrist_capacity < motion.waving_window {
            return Err(invalid(format!(
                "wrist_capacity ({}) is smaller than waving_window ({})",
                motion.wrist_capacity, motion.waving_window
            )));
        }

        let positive = [
            ("moving_threshold", motion.moving_threshold),
            ("waving_threshold", motion.waving_threshold),
            ("waving_dominance", motion.waving_dominance),
            ("raise_margin", self.posture.raise_margin),
            ("level_tolerance", self.posture.level_tolerance),
            ("squat_knee_max", self.posture.squat_knee_max),
            ("sit_knee_max", self.posture.sit_knee_max),
            ("sit_hip_knee_tolerance", self.posture.sit_hip_knee_tolerance),
            ("stand_knee_min", self.posture.stand_knee_min),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, v)| !(v.is_finite() && *v > 0.0)) {
            return Err(invalid(format!("{name} must be a positive number, got {value}")));
        }

        let ratios = [
            ("sit_shoulder_hip_ratio_max", self.posture.sit_shoulder_hip_ratio_max),
            ("sit_hip_knee_ratio_min", self.posture.sit_hip_knee_ratio_min),
            ("stand_shoulder_hip_ratio_min", self.posture.stand_shoulder_hip_ratio_min),
            ("stand_hip_knee_ratio_min", self.posture.stand_hip_knee_ratio_min),
        ];
        if let Some((name, value)) = ratios.iter().find(|(_, v)| !(0.0..=1.0).contains(v)) {
            return Err(invalid(format!("{name} must be within [0, 1], got {value}")));
        }

        let angles = [
            ("squat_knee_max", self.posture.squat_knee_max),
            ("squat_hip_min", self.posture.squat_hip_min),
            ("sit_knee_max", self.posture.sit_knee_max),
            ("stand_knee_min", self.posture.stand_knee_min),
        ];
        if let Some((name, value)) = angles.iter().find(|(_, v)| !(0.0..=180.0).contains(v)) {
            return Err(invalid(format!("{name} must be an angle within [0, 180], got {value}")));
        }

        Ok(())
    }
}

fn invalid(message: String) -> ActivityError {
    ActivityError::InvalidConfig(message)
}

/// Settings for the tokio stream driver.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// How often the driver classifies the newest pending frame.
    pub tick_interval: Duration,
    /// Bounded capacity of the control queue (reset, shutdown) of one stream.
    pub command_queue: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            command_queue: 8,
        }
    }
}

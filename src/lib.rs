// THEORY:
// This file is the main entry point for the `pose_activity` library crate.
// It defines the public API exposed to hosts that own a camera and a pose
// detector and want one activity label per frame back.
//
// The primary exports are the `ActivityClassifier` (stateful, one per capture
// stream), the pure `classify_frame` function, and the `ActivityStream` driver
// that runs a classifier on a fixed tick inside a tokio task. The geometric
// and temporal building blocks live in `core_modules` and are public so hosts
// and tests can reach the individual detectors directly.

pub mod config;
pub mod core_modules;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod stream_pipeline;

pub use config::{ClassifierConfig, MotionConfig, PostureThresholds, StreamConfig};
pub use core_modules::activity::ActivityLabel;
pub use core_modules::keypoint::{Frame, Keypoint, KeypointName};
pub use error::{ActivityError, Result};
pub use pipeline::{ActivityClassifier, ActivityReport, classify_frame};
pub use stream_pipeline::{ActivityStream, ActivityUpdate, StreamPool};

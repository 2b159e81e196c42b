pub mod activity;
pub mod geometry;
pub mod history;
pub mod keypoint;
pub mod motion;
pub mod posture;
pub mod timeline;

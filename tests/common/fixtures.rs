#![allow(dead_code)]

use pose_activity::{Frame, Keypoint, KeypointName};

pub const SCORE: f64 = 0.9;

pub fn frame_from(points: &[(KeypointName, (f64, f64))]) -> Frame {
    points
        .iter()
        .map(|&(name, (x, y))| Keypoint::new(name, x, y, SCORE))
        .collect()
}

/// Point at `len` from `origin` along `heading_deg` (image axes, y down).
pub fn polar(origin: (f64, f64), heading_deg: f64, len: f64) -> (f64, f64) {
    let rad = heading_deg.to_radians();
    (origin.0 + len * rad.cos(), origin.1 + len * rad.sin())
}

/// Facing the camera, legs straight, arms hanging, everything level.
pub fn standing_frame() -> Frame {
    use KeypointName::*;
    frame_from(&[
        (Nose, (320.0, 140.0)),
        (LeftEye, (310.0, 130.0)),
        (RightEye, (330.0, 130.0)),
        (LeftEar, (300.0, 135.0)),
        (RightEar, (340.0, 135.0)),
        (LeftShoulder, (280.0, 200.0)),
        (RightShoulder, (360.0, 200.0)),
        (LeftElbow, (270.0, 270.0)),
        (RightElbow, (370.0, 270.0)),
        (LeftWrist, (265.0, 330.0)),
        (RightWrist, (375.0, 330.0)),
        (LeftHip, (290.0, 330.0)),
        (RightHip, (350.0, 330.0)),
        (LeftKnee, (290.0, 450.0)),
        (RightKnee, (350.0, 450.0)),
        (LeftAnkle, (290.0, 570.0)),
        (RightAnkle, (350.0, 570.0)),
    ])
}

/// Standing pose with both wrists `margin` above their shoulders.
pub fn raised_hands_frame(margin: f64) -> Frame {
    let mut frame = standing_frame();
    for (wrist, shoulder) in [
        (KeypointName::LeftWrist, KeypointName::LeftShoulder),
        (KeypointName::RightWrist, KeypointName::RightShoulder),
    ] {
        let shoulder = *frame.get(shoulder).unwrap();
        let wrist = *frame.get(wrist).unwrap();
        frame.insert(Keypoint::new(wrist.name, wrist.x, shoulder.y - margin, SCORE));
    }
    frame
}

/// Deep squat: torso upright, knee angles 80/82, hip angles 60/58,
/// shoulders 5 apart vertically, nose above the shoulders.
pub fn squat_frame() -> Frame {
    use KeypointName::*;

    let left_hip = (290.0, 330.0);
    let left_knee = polar(left_hip, -90.0 + 60.0, 100.0);
    let left_ankle = polar(left_knee, 150.0 - 80.0, 100.0);

    let right_hip = (350.0, 335.0);
    let right_knee = polar(right_hip, -90.0 + 58.0, 100.0);
    let right_ankle = polar(right_knee, 148.0 - 82.0, 100.0);

    frame_from(&[
        (Nose, (320.0, 160.0)),
        (LeftShoulder, (290.0, 210.0)),
        (RightShoulder, (350.0, 215.0)),
        (LeftElbow, (285.0, 260.0)),
        (RightElbow, (355.0, 265.0)),
        (LeftWrist, (300.0, 300.0)),
        (RightWrist, (340.0, 300.0)),
        (LeftHip, left_hip),
        (RightHip, right_hip),
        (LeftKnee, left_knee),
        (RightKnee, right_knee),
        (LeftAnkle, left_ankle),
        (RightAnkle, right_ankle),
    ])
}

/// Seated in profile: thighs near horizontal, shins angled forward (knee ~113 deg).
pub fn sitting_frame() -> Frame {
    seated_profile_frame(5.0)
}

/// Seated profile with each hip `hip_above_knee` units higher than its knee.
/// The shin is rotated with the thigh so the knee angle stays at 113 degrees.
pub fn seated_profile_frame(hip_above_knee: f64) -> Frame {
    use KeypointName::*;

    let mut points = vec![(Nose, (310.0, 150.0))];
    for (offset, side) in [(0.0, Side::Left), (10.0, Side::Right)] {
        let knee = (400.0 + offset, 300.0 + hip_above_knee);
        let towards_hip = (-hip_above_knee).atan2(-100.0).to_degrees();
        let ankle = polar(knee, towards_hip + 360.0 - SEATED_KNEE_ANGLE, 100.0);
        points.extend([
            (side.pick(LeftShoulder, RightShoulder), (300.0 + offset, 200.0)),
            (side.pick(LeftElbow, RightElbow), (320.0 + offset, 250.0)),
            (side.pick(LeftWrist, RightWrist), (350.0 + offset, 280.0)),
            (side.pick(LeftHip, RightHip), (300.0 + offset, 300.0)),
            (side.pick(LeftKnee, RightKnee), knee),
            (side.pick(LeftAnkle, RightAnkle), ankle),
        ]);
    }
    frame_from(&points)
}

pub const SEATED_KNEE_ANGLE: f64 = 113.0;

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

impl Side {
    fn pick(self, left: KeypointName, right: KeypointName) -> KeypointName {
        match self {
            Side::Left => left,
            Side::Right => right,
        }
    }
}

/// Every keypoint shifted by `(dx, dy)`.
pub fn translated(frame: &Frame, dx: f64, dy: f64) -> Frame {
    frame
        .iter()
        .map(|kp| Keypoint::new(kp.name, kp.x + dx, kp.y + dy, kp.score))
        .collect()
}

/// A copy of `frame` with one keypoint replaced.
pub fn with_point(frame: &Frame, name: KeypointName, x: f64, y: f64) -> Frame {
    let mut frame = frame.clone();
    frame.insert(Keypoint::new(name, x, y, SCORE));
    frame
}

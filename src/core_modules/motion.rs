// THEORY:
// The `motion` module turns the sliding windows kept by `history` into two
// yes/no signals that no single frame can provide.
//
// 1.  **Movement**: The nose stands in for the whole body. Averaging the step
//     length over several consecutive frames suppresses single-frame jitter from
//     the pose detector while still reacting within about half a second at ten
//     frames per second.
// 2.  **Waving**: A wave is lateral. Each wrist's average horizontal travel must
//     clear an absolute threshold and dominate its vertical travel by a fixed
//     factor, which separates waving from raising or lowering an arm. Either hand
//     is enough.
//
// Both detectors share a cold-start policy: with fewer samples than their window
// they report `false`. That is a normal answer, not an error.

use crate::config::MotionConfig;
use crate::core_modules::geometry::geometry::{Point, distance};
use crate::core_modules::history::{History, WristPair};

/// Whether the tracked reference point has been travelling over the last
/// `moving_window` samples.
pub fn is_moving(positions: &History<Point>, config: &MotionConfig) -> bool {
    let window = config.moving_window;
    if window < 2 || positions.len() < window {
        return false;
    }

    let recent: Vec<Point> = positions.recent(window).copied().collect();
    let steps: Vec<f64> = recent.windows(2).map(|pair| distance(pair[0], pair[1])).collect();
    let average = mean(&steps);

    average > config.moving_threshold
}

/// Whether either wrist has been swinging sideways over the last
/// `waving_window` samples.
pub fn is_waving(wrists: &History<WristPair>, config: &MotionConfig) -> bool {
    let window = config.waving_window;
    if window < 2 || wrists.len() < window {
        return false;
    }

    let recent: Vec<WristPair> = wrists.recent(window).copied().collect();
    let left: Vec<Point> = recent.iter().map(|pair| pair.left).collect();
    let right: Vec<Point> = recent.iter().map(|pair| pair.right).collect();

    side_is_waving(&left, config) || side_is_waving(&right, config)
}

/// Average absolute per-frame travel of one wrist, as (horizontal, vertical).
pub fn average_travel(track: &[Point]) -> (f64, f64) {
    let (dx, dy): (Vec<f64>, Vec<f64>) = track
        .windows(2)
        .map(|pair| ((pair[1].x - pair[0].x).abs(), (pair[1].y - pair[0].y).abs()))
        .unzip();
    (mean(&dx), mean(&dy))
}

fn side_is_waving(track: &[Point], config: &MotionConfig) -> bool {
    let (horizontal, vertical) = average_travel(track);
    horizontal > config.waving_threshold && horizontal > config.waving_dominance * vertical
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(points: impl IntoIterator<Item = (f64, f64)>) -> History<Point> {
        let mut history = History::new(10);
        for point in points {
            history.append(Point::from(point));
        }
        history
    }

    fn wrists(left: impl IntoIterator<Item = (f64, f64)>, right: (f64, f64)) -> History<WristPair> {
        let mut history = History::new(20);
        for l in left {
            history.append(WristPair {
                left: Point::from(l),
                right: Point::from(right),
            });
        }
        history
    }

    #[test]
    fn not_moving_during_cold_start() {
        let history = positions((0..4).map(|i| (i as f64 * 100.0, 0.0)));
        assert!(!is_moving(&history, &MotionConfig::default()));
    }

    #[test]
    fn moving_when_average_step_exceeds_threshold() {
        let history = positions((0..5).map(|i| (i as f64 * 20.0, 0.0)));
        assert!(is_moving(&history, &MotionConfig::default()));
    }

    #[test]
    fn step_at_threshold_is_not_moving() {
        let history = positions((0..5).map(|i| (0.0, i as f64 * 15.0)));
        assert!(!is_moving(&history, &MotionConfig::default()));
    }

    #[test]
    fn only_the_latest_window_counts() {
        // A large jump early on falls outside the five-sample window.
        let mut points = vec![(0.0, 0.0), (500.0, 0.0)];
        points.extend((0..5).map(|i| (500.0 + i as f64, 0.0)));
        let history = positions(points);
        assert!(!is_moving(&history, &MotionConfig::default()));
    }

    #[test]
    fn not_waving_during_cold_start() {
        let left = (0..9).map(|i| (300.0 + if i % 2 == 0 { 15.0 } else { -15.0 }, 200.0));
        let history = wrists(left, (400.0, 200.0));
        assert!(!is_waving(&history, &MotionConfig::default()));
    }

    #[test]
    fn lateral_oscillation_is_waving() {
        let left = (0..10).map(|i| (300.0 + if i % 2 == 0 { 15.0 } else { -15.0 }, 200.0));
        let history = wrists(left, (400.0, 200.0));
        assert!(is_waving(&history, &MotionConfig::default()));
    }

    #[test]
    fn vertical_motion_is_not_waving() {
        // 30 sideways but 20 vertical each frame: horizontal does not dominate 2x.
        let left = (0..10).map(|i| {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            (300.0 + 15.0 * sign, 200.0 + 10.0 * sign)
        });
        let history = wrists(left, (400.0, 200.0));
        assert!(!is_waving(&history, &MotionConfig::default()));
    }

    #[test]
    fn small_lateral_jitter_is_not_waving() {
        let left = (0..10).map(|i| (300.0 + if i % 2 == 0 { 5.0 } else { -5.0 }, 200.0));
        let history = wrists(left, (400.0, 200.0));
        assert!(!is_waving(&history, &MotionConfig::default()));
    }

    #[test]
    fn right_hand_alone_is_enough() {
        let mut history = History::new(20);
        for i in 0..10 {
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            history.append(WristPair {
                left: Point::new(200.0, 300.0),
                right: Point::new(450.0 + 25.0 * sign, 150.0),
            });
        }
        assert!(is_waving(&history, &MotionConfig::default()));
    }

    #[test]
    fn average_travel_of_short_track_is_zero() {
        assert_eq!(average_travel(&[Point::new(1.0, 1.0)]), (0.0, 0.0));
    }
}

// THEORY:
// The `geometry` module is the lowest layer of the activity engine. It knows
// nothing about bodies, frames or time: it only measures the relationship
// between points on the image plane.
//
// Key principles:
// 1.  **Image coordinates**: Origin is top-left and y grows downward. Every rule
//     built on top of these functions ("above", "level", "higher") inherits that
//     convention, so nothing here flips the axis.
// 2.  **Total functions**: Nothing in this module panics or returns an error.
//     Coincident points give a zero angle, and non-finite coordinates flow
//     through as `NaN` so the caller's comparisons simply fail.

pub mod geometry {
    use serde::{Deserialize, Serialize};

    /// A position on the image plane, in the same units as the input keypoints.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
    pub struct Point {
        pub x: f64,
        pub y: f64,
    }

    impl Point {
        pub const fn new(x: f64, y: f64) -> Self {
            Self { x, y }
        }

        pub fn midpoint(&self, other: &Point) -> Point {
            Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
        }
    }

    impl From<(f64, f64)> for Point {
        fn from((x, y): (f64, f64)) -> Self {
            Self { x, y }
        }
    }

    /// The angle at `vertex` between the rays towards `a` and `b`, in degrees.
    ///
    /// The result is folded into `[0, 180]`: a raw difference of headings above
    /// 180 is reported as its reflex complement. When either ray has zero length
    /// its heading is 0, so `angle_degrees(p, p, p)` is 0.
    pub fn angle_degrees(a: Point, vertex: Point, b: Point) -> f64 {
        let heading_b = (b.y - vertex.y).atan2(b.x - vertex.x);
        let heading_a = (a.y - vertex.y).atan2(a.x - vertex.x);
        let angle = (heading_b - heading_a).to_degrees().abs();

        // Headings of exactly -180 and 180 can round the raw value past 360.
        if angle > 180.0 { (360.0 - angle).max(0.0) } else { angle }
    }

    /// Euclidean distance between two points.
    pub fn distance(a: Point, b: Point) -> f64 {
        (b.x - a.x).hypot(b.y - a.y)
    }
}

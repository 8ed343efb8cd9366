//! Integer schematic coordinates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position on a schematic, in nanometres.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in nanometres.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }

    /// True if `self` lies within `tolerance` of `other`.
    pub fn is_near(&self, other: &Point, tolerance: i64) -> bool {
        if tolerance <= 0 {
            return self == other;
        }
        self.distance_to(other) <= tolerance as f64
    }

    /// Shortest distance from `self` to the segment `a`-`b`.
    pub fn distance_to_segment(&self, a: &Point, b: &Point) -> f64 {
        let (ax, ay) = (a.x as f64, a.y as f64);
        let (bx, by) = (b.x as f64, b.y as f64);
        let (px, py) = (self.x as f64, self.y as f64);
        let (dx, dy) = (bx - ax, by - ay);
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return self.distance_to(a);
        }
        let t = (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0);
        (px - (ax + t * dx)).hypot(py - (ay + t * dy))
    }

    /// True if `self` lies on the segment `a`-`b` (within `tolerance`).
    pub fn is_on_segment(&self, a: &Point, b: &Point, tolerance: i64) -> bool {
        if tolerance <= 0 {
            // exact test: collinear and inside the bounding box
            let (ax, ay) = (a.x as i128, a.y as i128);
            let cross = (b.x as i128 - ax) * (self.y as i128 - ay)
                - (b.y as i128 - ay) * (self.x as i128 - ax);
            return cross == 0
                && self.x >= a.x.min(b.x)
                && self.x <= a.x.max(b.x)
                && self.y >= a.y.min(b.y)
                && self.y <= a.y.max(b.y);
        }
        self.distance_to_segment(a, b) <= tolerance as f64
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

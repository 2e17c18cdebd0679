//! Catmull-Rom spline through a list of control points.

use serde::{Deserialize, Serialize};

use spawnwave_core::types::Vec3;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Spline {
    pub points: Vec<Vec3>,
    /// Connect the last point back to the first.
    #[serde(default)]
    pub closed: bool,
}

impl Spline {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    pub fn closed(points: Vec<Vec3>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    fn segment_count(&self) -> usize {
        match self.points.len() {
            0 | 1 => 0,
            n if self.closed => n,
            n => n - 1,
        }
    }

    /// Position at normalized parameter `u` (clamped to [0, 1]).
    /// The curve passes through every control point.
    pub fn evaluate(&self, u: f32) -> Vec3 {
        let n = self.points.len();
        match n {
            0 => return Vec3::ZERO,
            1 => return self.points[0],
            _ => {}
        }

        let segments = self.segment_count();
        let t = u.clamp(0.0, 1.0) * segments as f32;
        let segment = (t.floor() as usize).min(segments - 1);
        let local = t - segment as f32;

        let at = |i: isize| -> Vec3 {
            if self.closed {
                self.points[i.rem_euclid(n as isize) as usize]
            } else {
                self.points[i.clamp(0, n as isize - 1) as usize]
            }
        };
        let i = segment as isize;
        catmull_rom(at(i - 1), at(i), at(i + 1), at(i + 2), local)
    }
}

fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

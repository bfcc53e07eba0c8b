use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Circle {
    #[must_use]
    pub const fn new(cx: f64, cy: f64, r: f64) -> Self {
        Self { cx, cy, r }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        !(self.r > 0.0)
    }

    #[must_use]
    pub fn distance_to(self, x: f64, y: f64) -> f64 {
        (x - self.cx).hypot(y - self.cy)
    }

    #[must_use]
    pub fn center_distance(self, other: Circle) -> f64 {
        self.distance_to(other.cx, other.cy)
    }

    /// Strict interior test; empty circles contain nothing.
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        !self.is_empty() && self.distance_to(x, y) < self.r
    }

    #[must_use]
    pub fn point_at(self, angle: f64) -> (f64, f64) {
        (self.cx + self.r * angle.cos(), self.cy + self.r * angle.sin())
    }

    #[must_use]
    pub fn area(self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            PI * self.r * self.r
        }
    }

    /// Same center and radius within `tolerance`.
    #[must_use]
    pub fn coincides_with(self, other: Circle, tolerance: f64) -> bool {
        self.center_distance(other) <= tolerance && (self.r - other.r).abs() <= tolerance
    }

    /// Angles on `self` where the boundaries of both circles cross.
    ///
    /// Returns `None` for disjoint, contained, tangent or concentric pairs.
    #[must_use]
    pub fn crossing_angles(self, other: Circle) -> Option<[f64; 2]> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        let d = self.center_distance(other);
        let tolerance = 1e-12 * self.r.max(other.r);
        if d <= tolerance
            || d >= self.r + other.r - tolerance
            || d <= (self.r - other.r).abs() + tolerance
        {
            return None;
        }
        let base = (other.cy - self.cy).atan2(other.cx - self.cx);
        let cosine = (d * d + self.r * self.r - other.r * other.r) / (2.0 * d * self.r);
        let spread = cosine.clamp(-1.0, 1.0).acos();
        Some([
            normalize_angle(base - spread),
            normalize_angle(base + spread),
        ])
    }
}

/// Maps an angle into `[0, TAU)`.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Area shared by two circles with radii `r1`, `r2` whose centers are `d` apart.
#[must_use]
pub fn lens_area(r1: f64, r2: f64, d: f64) -> f64 {
    if r1 <= 0.0 || r2 <= 0.0 || d >= r1 + r2 {
        return 0.0;
    }
    let min_r = r1.min(r2);
    if d <= (r1 - r2).abs() {
        return PI * min_r * min_r;
    }
    let alpha = ((d * d + r1 * r1 - r2 * r2) / (2.0 * d * r1))
        .clamp(-1.0, 1.0)
        .acos();
    let beta = ((d * d + r2 * r2 - r1 * r1) / (2.0 * d * r2))
        .clamp(-1.0, 1.0)
        .acos();
    let kite = ((-d + r1 + r2) * (d + r1 - r2) * (d - r1 + r2) * (d + r1 + r2)).max(0.0);
    r1 * r1 * alpha + r2 * r2 * beta - 0.5 * kite.sqrt()
}

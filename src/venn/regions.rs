use std::f64::consts::TAU;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use smallvec::SmallVec;

use crate::render::PathPrimitive;
use crate::venn::RegionKey;
use crate::venn::geometry::Circle;

const ANCHOR_GRID: usize = 32;

/// Circle arc traversed from `start_angle` by `sweep` radians.
///
/// Positive sweeps keep the region on the inside of the circle, negative
/// sweeps keep it outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSegment {
    pub circle: Circle,
    pub start_angle: f64,
    pub sweep: f64,
}

impl ArcSegment {
    #[must_use]
    pub fn start_point(&self) -> (f64, f64) {
        self.circle.point_at(self.start_angle)
    }

    #[must_use]
    pub fn end_point(&self) -> (f64, f64) {
        self.circle.point_at(self.start_angle + self.sweep)
    }

    #[must_use]
    pub fn midpoint(&self) -> (f64, f64) {
        self.circle.point_at(self.start_angle + 0.5 * self.sweep)
    }

    #[must_use]
    pub fn is_full_turn(&self) -> bool {
        (self.sweep.abs() - TAU).abs() <= 1e-9
    }

    /// Contribution of this arc to the enclosed area (Green's theorem).
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        let Circle { cx, cy, r } = self.circle;
        let a = self.start_angle;
        let b = a + self.sweep;
        0.5 * (r * r * self.sweep + cx * r * (b.sin() - a.sin()) - cy * r * (b.cos() - a.cos()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegionShape {
    /// No area left after overlaying the other circles.
    Empty,
    /// A single untouched circle.
    Circle(Circle),
    /// One circle with whole circles cut out of its interior.
    Ring { outer: Circle, holes: Vec<Circle> },
    /// Closed loops of circle arcs.
    Arcs(Vec<Vec<ArcSegment>>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub key: RegionKey,
    pub shape: RegionShape,
    pub area: f64,
    /// Interior point for label placement, `None` for empty regions.
    pub anchor: Option<(f64, f64)>,
}

impl Region {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.shape, RegionShape::Empty)
    }

    /// Outline of the region; holes run opposite to outer boundaries.
    #[must_use]
    pub fn path(&self) -> Option<PathPrimitive> {
        match &self.shape {
            RegionShape::Empty => None,
            RegionShape::Circle(circle) => {
                Some(PathPrimitive::circle(circle.cx, circle.cy, circle.r))
            }
            RegionShape::Ring { outer, holes } => {
                let mut path = PathPrimitive::circle(outer.cx, outer.cy, outer.r);
                for hole in holes {
                    path.move_to(hole.cx + hole.r, hole.cy);
                    path.arc(hole.cx, hole.cy, hole.r, 0.0, -TAU);
                    path.close();
                }
                Some(path)
            }
            RegionShape::Arcs(loops) => {
                let mut path = PathPrimitive::new();
                for arcs in loops {
                    let Some(first) = arcs.first() else {
                        continue;
                    };
                    let (x, y) = first.start_point();
                    path.move_to(x, y);
                    for arc in arcs {
                        path.arc(
                            arc.circle.cx,
                            arc.circle.cy,
                            arc.circle.r,
                            arc.start_angle,
                            arc.sweep,
                        );
                    }
                    path.close();
                }
                Some(path)
            }
        }
    }
}

/// Builds all seven regions for circles A, B, C.
///
/// Regions involving an empty circle are [`RegionShape::Empty`], so a
/// two-circle arrangement yields three non-empty regions at most.
#[must_use]
pub fn make_regions(circles: &[Circle; 3]) -> IndexMap<RegionKey, Region> {
    let scale = arrangement_scale(circles);
    RegionKey::ALL
        .into_iter()
        .map(|key| (key, build_region(circles, key, scale)))
        .collect()
}

/// Areas of the seven regions in [`RegionKey::ALL`] order.
#[must_use]
pub fn region_areas(circles: &[Circle; 3]) -> [f64; 7] {
    let scale = arrangement_scale(circles);
    RegionKey::ALL.map(|key| {
        let area = trace_boundary(circles, key, scale)
            .iter()
            .map(ArcSegment::signed_area)
            .sum::<f64>();
        if area > area_epsilon(scale) { area } else { 0.0 }
    })
}

fn arrangement_scale(circles: &[Circle; 3]) -> f64 {
    circles
        .iter()
        .filter(|circle| !circle.is_empty())
        .map(|circle| circle.r)
        .fold(0.0, f64::max)
}

fn area_epsilon(scale: f64) -> f64 {
    1e-9 * scale * scale + 1e-12
}

fn build_region(circles: &[Circle; 3], key: RegionKey, scale: f64) -> Region {
    let segments = trace_boundary(circles, key, scale);
    let area: f64 = segments.iter().map(ArcSegment::signed_area).sum();
    if segments.is_empty() || area <= area_epsilon(scale) {
        return Region {
            key,
            shape: RegionShape::Empty,
            area: 0.0,
            anchor: None,
        };
    }

    let loops = chain_loops(segments, scale);
    let shape = classify(loops);
    let anchor = match &shape {
        RegionShape::Circle(circle) => Some((circle.cx, circle.cy)),
        RegionShape::Empty => None,
        _ => sample_anchor(circles, key, scale).or_else(|| fallback_anchor(&shape)),
    };

    Region {
        key,
        shape,
        area,
        anchor,
    }
}

fn coincidence_tolerance(scale: f64) -> f64 {
    1e-9 * scale.max(1e-12)
}

/// Collects every arc that bounds `key`, oriented so the region lies on its
/// left in math orientation.
fn trace_boundary(circles: &[Circle; 3], key: RegionKey, scale: f64) -> Vec<ArcSegment> {
    let members = key.members();
    if (0..3).any(|index| members[index] && circles[index].is_empty()) {
        return Vec::new();
    }

    let relevant: SmallVec<[usize; 3]> =
        (0..3).filter(|index| !circles[*index].is_empty()).collect();
    let tolerance = coincidence_tolerance(scale);
    let mut segments = Vec::new();

    for &k in &relevant {
        let circle = circles[k];
        let duplicate = relevant
            .iter()
            .any(|&j| j < k && circles[j].coincides_with(circle, tolerance));
        if duplicate {
            continue;
        }

        // Containment of `circle` in circles it never crosses, decided from
        // centers and radii so tangent points cannot mislead the midpoint test.
        let mut nested: [Option<bool>; 3] = [None; 3];
        let mut angles: SmallVec<[f64; 4]> = SmallVec::new();
        for &j in &relevant {
            if j == k || circles[j].coincides_with(circle, tolerance) {
                continue;
            }
            match circle.crossing_angles(circles[j]) {
                Some(pair) => angles.extend(pair),
                None => {
                    nested[j] = Some(
                        circle.center_distance(circles[j]) + circle.r <= circles[j].r + tolerance,
                    );
                }
            }
        }
        angles.sort_by_key(|angle| OrderedFloat(*angle));
        angles.dedup_by(|a, b| (*a - *b).abs() <= 1e-12);

        let spans: SmallVec<[(f64, f64); 4]> = if angles.is_empty() {
            SmallVec::from_slice(&[(0.0, TAU)])
        } else {
            (0..angles.len())
                .map(|index| {
                    let start = angles[index];
                    let end = angles.get(index + 1).copied().unwrap_or(angles[0] + TAU);
                    (start, end)
                })
                .collect()
        };

        for (start, end) in spans {
            let (x, y) = circle.point_at(0.5 * (start + end));
            let on_boundary = relevant.iter().filter(|&&j| j != k).all(|&j| {
                let inside = if circles[j].coincides_with(circle, tolerance) {
                    members[k]
                } else if let Some(inside) = nested[j] {
                    inside
                } else {
                    circles[j].contains(x, y)
                };
                inside == members[j]
            });
            if !on_boundary {
                continue;
            }
            let segment = if members[k] {
                ArcSegment {
                    circle,
                    start_angle: start,
                    sweep: end - start,
                }
            } else {
                ArcSegment {
                    circle,
                    start_angle: end,
                    sweep: start - end,
                }
            };
            segments.push(segment);
        }
    }

    segments
}

fn chain_loops(mut segments: Vec<ArcSegment>, scale: f64) -> Vec<Vec<ArcSegment>> {
    let tolerance = 1e-6 * scale.max(1e-12);
    let close = |a: (f64, f64), b: (f64, f64)| (a.0 - b.0).hypot(a.1 - b.1) <= tolerance;
    let mut loops = Vec::new();

    while !segments.is_empty() {
        let first = segments.remove(0);
        let origin = first.start_point();
        let mut tail = first.end_point();
        let mut current = vec![first];

        while !close(tail, origin) {
            let next = segments.iter().position(|segment| close(segment.start_point(), tail));
            let Some(index) = next else {
                break;
            };
            let segment = segments.remove(index);
            tail = segment.end_point();
            current.push(segment);
        }
        loops.push(current);
    }

    loops
}

fn classify(loops: Vec<Vec<ArcSegment>>) -> RegionShape {
    let all_full_circles = loops
        .iter()
        .all(|arcs| arcs.len() == 1 && arcs[0].is_full_turn());
    if !all_full_circles {
        return RegionShape::Arcs(loops);
    }

    let outer: Vec<Circle> = loops
        .iter()
        .filter(|arcs| arcs[0].sweep > 0.0)
        .map(|arcs| arcs[0].circle)
        .collect();
    let holes: Vec<Circle> = loops
        .iter()
        .filter(|arcs| arcs[0].sweep < 0.0)
        .map(|arcs| arcs[0].circle)
        .collect();

    match (outer.as_slice(), holes.is_empty()) {
        ([circle], true) => RegionShape::Circle(*circle),
        ([circle], false) => RegionShape::Ring {
            outer: *circle,
            holes,
        },
        _ => RegionShape::Arcs(loops),
    }
}

/// Grid-samples the region and keeps the point farthest from any boundary.
///
/// Thin regions that the coarse grid misses get a second, finer pass.
fn sample_anchor(circles: &[Circle; 3], key: RegionKey, scale: f64) -> Option<(f64, f64)> {
    let members = key.members();
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for (index, circle) in circles.iter().enumerate() {
        if !members[index] {
            continue;
        }
        let own = (
            circle.cx - circle.r,
            circle.cy - circle.r,
            circle.cx + circle.r,
            circle.cy + circle.r,
        );
        bounds = Some(match bounds {
            None => own,
            Some((x1, y1, x2, y2)) => (x1.max(own.0), y1.max(own.1), x2.min(own.2), y2.min(own.3)),
        });
    }
    let bounds = bounds?;
    if bounds.2 <= bounds.0 || bounds.3 <= bounds.1 {
        return None;
    }

    [ANCHOR_GRID, 4 * ANCHOR_GRID]
        .into_iter()
        .find_map(|grid| sample_grid(circles, members, bounds, grid, scale))
}

fn sample_grid(
    circles: &[Circle; 3],
    members: [bool; 3],
    (x1, y1, x2, y2): (f64, f64, f64, f64),
    grid: usize,
    scale: f64,
) -> Option<(f64, f64)> {
    let tolerance = coincidence_tolerance(scale);
    let step_x = (x2 - x1) / grid as f64;
    let step_y = (y2 - y1) / grid as f64;
    let mut best: Option<((f64, f64), f64)> = None;

    for row in 0..grid {
        for column in 0..grid {
            let x = x1 + (column as f64 + 0.5) * step_x;
            let y = y1 + (row as f64 + 0.5) * step_y;
            let inside = circles
                .iter()
                .enumerate()
                .all(|(index, circle)| circle.contains(x, y) == members[index]);
            if !inside {
                continue;
            }
            let clearance = circles
                .iter()
                .filter(|circle| !circle.is_empty())
                .map(|circle| (circle.distance_to(x, y) - circle.r).abs())
                .fold(f64::INFINITY, f64::min);
            if best.is_none_or(|(_, score)| clearance > score + tolerance) {
                best = Some(((x, y), clearance));
            }
        }
    }

    best.map(|(point, _)| point)
}

/// Anchor for regions too thin for the grid: a point just off the boundary
/// on the region side.
fn fallback_anchor(shape: &RegionShape) -> Option<(f64, f64)> {
    match shape {
        RegionShape::Arcs(loops) => {
            let arc = loops
                .iter()
                .flatten()
                .max_by_key(|arc| OrderedFloat(arc.sweep.abs() * arc.circle.r))?;
            let (x, y) = arc.midpoint();
            let inward = if arc.sweep > 0.0 { 1e-3 } else { -1e-3 };
            Some((x + (arc.circle.cx - x) * inward, y + (arc.circle.cy - y) * inward))
        }
        RegionShape::Ring { outer, holes } => {
            let Some(hole) = holes.first() else {
                return Some((outer.cx, outer.cy));
            };
            let offset = (outer.cx - hole.cx, outer.cy - hole.cy);
            let length = offset.0.hypot(offset.1);
            let (dx, dy) = if length > 0.0 {
                (offset.0 / length, offset.1 / length)
            } else {
                (1.0, 0.0)
            };
            let near = (hole.cx + dx * hole.r, hole.cy + dy * hole.r);
            let far = (outer.cx + dx * outer.r, outer.cy + dy * outer.r);
            Some((0.5 * (near.0 + far.0), 0.5 * (near.1 + far.1)))
        }
        RegionShape::Circle(circle) => Some((circle.cx, circle.cy)),
        RegionShape::Empty => None,
    }
}

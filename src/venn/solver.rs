use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::Frame;
use crate::error::{ChartError, ChartResult};
use crate::venn::geometry::{Circle, lens_area};
use crate::venn::regions::region_areas;
use crate::venn::{CircleKey, RegionKey, VennMode, VennValues};

/// Pair order used by distance triples: AB, AC, BC.
const PAIRS: [(usize, usize); 3] = [(0, 1), (0, 2), (1, 2)];

/// Numeric knobs of the circle placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VennSolverConfig {
    /// Gap between non-overlapping circles, relative to the biggest radius.
    pub spacing: f64,
    /// Relative error of a pairwise overlap accepted by the bisection.
    pub bisection_tolerance: f64,
    pub bisection_max_iterations: usize,
    /// Normalized residual of all seven regions that stops the refinement.
    pub refine_tolerance: f64,
    pub refine_max_iterations: usize,
}

impl Default for VennSolverConfig {
    fn default() -> Self {
        Self {
            spacing: 0.1,
            bisection_tolerance: 1e-4,
            bisection_max_iterations: 100,
            refine_tolerance: 1e-4,
            refine_max_iterations: 200,
        }
    }
}

impl VennSolverConfig {
    #[must_use]
    pub fn with_spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    #[must_use]
    pub fn with_refine_max_iterations(mut self, iterations: usize) -> Self {
        self.refine_max_iterations = iterations;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.spacing.is_finite() || self.spacing < 0.0 {
            return Err(ChartError::InvalidConfig(
                "venn spacing must be finite and >= 0".to_owned(),
            ));
        }
        for (name, value) in [
            ("bisection_tolerance", self.bisection_tolerance),
            ("refine_tolerance", self.refine_tolerance),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "venn `{name}` must be finite and > 0"
                )));
            }
        }
        if self.bisection_tolerance >= 1.0 {
            return Err(ChartError::InvalidConfig(
                "venn `bisection_tolerance` must be < 1".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Places circles A, B, C for the given region values.
///
/// Circle areas equal circle totals in `Semi` and `Full` modes. All-zero
/// input yields three empty circles at the origin.
pub fn calc_venn(
    values: &VennValues,
    mode: VennMode,
    config: &VennSolverConfig,
) -> ChartResult<[Circle; 3]> {
    config.validate()?;

    let totals = CircleKey::ALL.map(|key| values.circle_total(key));
    if totals.iter().all(|total| *total <= 0.0) {
        debug!("venn input is empty, using zero circles");
        return Ok([Circle::default(); 3]);
    }

    let mut radii = totals.map(|total| (total / PI).sqrt());
    let max_radius = radii.iter().copied().fold(0.0, f64::max);
    let spacing = config.spacing * max_radius;

    let distances = match mode {
        VennMode::None => {
            radii = [
                1.0,
                1.0,
                if values.has_third_set() { 1.0 } else { 0.0 },
            ];
            [1.0; 3]
        }
        VennMode::Semi => PAIRS.map(|(i, j)| {
            let overlap = values.pair_overlap(CircleKey::ALL[i], CircleKey::ALL[j]);
            if overlap > 0.0 {
                radii[i].max(radii[j])
            } else {
                radii[i] + radii[j] + spacing
            }
        }),
        VennMode::Full => {
            let initial = PAIRS.map(|(i, j)| {
                let overlap = values.pair_overlap(CircleKey::ALL[i], CircleKey::ALL[j]);
                calc_distance(radii[i], radii[j], overlap, spacing, config)
            });
            if radii.iter().all(|r| *r > 0.0) {
                refine_distances(values, radii, initial, spacing, config)
            } else {
                initial
            }
        }
    };

    let centers = calc_coords(radii, distances);
    Ok([0, 1, 2].map(|index| Circle::new(centers[index].0, centers[index].1, radii[index])))
}

/// Center distance at which two circles share `overlap` area.
///
/// No overlap places the circles `spacing` apart; an overlap covering the
/// smaller circle nests it inside the bigger one.
#[must_use]
pub fn calc_distance(
    r1: f64,
    r2: f64,
    overlap: f64,
    spacing: f64,
    config: &VennSolverConfig,
) -> f64 {
    let mut lo = (r1 - r2).abs();
    let mut hi = r1 + r2;
    if overlap <= 0.0 || r1 <= 0.0 || r2 <= 0.0 {
        return hi + spacing;
    }

    let min_r = r1.min(r2);
    let max_error = overlap * config.bisection_tolerance;
    if overlap >= PI * min_r * min_r - max_error {
        return nested_distance(r1, r2, config);
    }

    let mut distance = 0.5 * (lo + hi);
    for _ in 0..config.bisection_max_iterations {
        distance = 0.5 * (lo + hi);
        let error = lens_area(r1, r2, distance) - overlap;
        if error.abs() <= max_error {
            break;
        }
        if error > 0.0 {
            lo = distance;
        } else {
            hi = distance;
        }
    }

    distance.max(nested_distance(r1, r2, config))
}

/// Center distance that keeps the smaller circle strictly inside the bigger
/// one, clear of internal tangency.
fn nested_distance(r1: f64, r2: f64, config: &VennSolverConfig) -> f64 {
    (r1 - r2).abs() * (1.0 - config.bisection_tolerance.sqrt())
}

/// Center coordinates for three circles at the requested AB, AC, BC
/// distances, centered on their common bounding box.
///
/// C is placed by triangulation when the distances allow it, otherwise the
/// circles are laid out on one line keeping intersecting pairs together.
#[must_use]
pub fn calc_coords(radii: [f64; 3], distances: [f64; 3]) -> [(f64, f64); 3] {
    // Working slot -> circle index, so the first two slots are never empty.
    let order: [usize; 3] = if radii[0] <= 0.0 {
        [1, 2, 0]
    } else if radii[1] <= 0.0 {
        [0, 2, 1]
    } else {
        [0, 1, 2]
    };
    let r = order.map(|index| radii[index]);
    let d = |i: usize, j: usize| pair_distance(&distances, order[i], order[j]);
    let (d_ab, d_ac, d_bc) = (d(0, 1), d(0, 2), d(1, 2));

    let i_ab = d_ab < r[0] + r[1];
    let i_ac = d_ac < r[0] + r[2];
    let i_bc = d_bc < r[1] + r[2];

    let (mut a_x, a_y) = (0.0, 0.0);
    let (mut b_x, b_y) = (d_ab, 0.0);
    let c_x;
    let mut c_y = 0.0;

    let n = if d_ab > 0.0 {
        0.5 * (d_ab * d_ab + d_ac * d_ac - d_bc * d_bc) / d_ab
    } else {
        0.0
    };
    let m = d_ac * d_ac - n * n;

    if d_ab > 0.0 && m > 0.0 {
        c_x = n;
        c_y = m.sqrt();
    } else if i_ab && i_ac && i_bc {
        c_x = a_x + d_ac;
    } else if i_ab && i_ac {
        c_x = a_x - d_ac;
    } else if i_ab && i_bc {
        c_x = b_x + d_bc;
    } else if i_bc && i_ac {
        c_x = a_x + d_ac;
        b_x = c_x + d_bc;
    } else if i_ab {
        c_x = (a_x + d_ac).max(b_x + d_bc);
    } else if i_ac {
        c_x = a_x - d_ac;
        b_x = (a_x + d_ab).max(c_x + d_bc);
    } else if i_bc {
        c_x = b_x + d_bc;
        a_x = (c_x - d_ac).min(b_x - d_ab);
    } else {
        c_x = b_x + d_bc;
    }

    let placed = [(a_x, a_y), (b_x, b_y), (c_x, c_y)];
    let circles = [0, 1, 2].map(|slot| Circle::new(placed[slot].0, placed[slot].1, r[slot]));
    let (x_off, y_off) = calc_bbox(&circles).map_or((0.0, 0.0), |bbox| (-bbox.cx(), -bbox.cy()));

    let mut centers = [(0.0, 0.0); 3];
    for (slot, index) in order.into_iter().enumerate() {
        centers[index] = (placed[slot].0 + x_off, placed[slot].1 + y_off);
    }
    centers
}

/// Bounding box of all non-empty circles.
#[must_use]
pub fn calc_bbox(circles: &[Circle; 3]) -> Option<Frame> {
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for circle in circles.iter().filter(|circle| !circle.is_empty()) {
        let (x1, y1, x2, y2) = (
            circle.cx - circle.r,
            circle.cy - circle.r,
            circle.cx + circle.r,
            circle.cy + circle.r,
        );
        bounds = Some(match bounds {
            None => (x1, y1, x2, y2),
            Some((min_x, min_y, max_x, max_y)) => {
                (min_x.min(x1), min_y.min(y1), max_x.max(x2), max_y.max(y2))
            }
        });
    }
    bounds.map(|(x1, y1, x2, y2)| Frame::from_edges(x1, y1, x2, y2))
}

/// Uniformly scales and translates circles so their bounding box fits
/// `target`, centered within it.
#[must_use]
pub fn fit_into(circles: &[Circle; 3], target: Frame) -> [Circle; 3] {
    let Some(bbox) = calc_bbox(circles) else {
        return [Circle::new(target.cx(), target.cy(), 0.0); 3];
    };

    let scale = if bbox.width > 0.0 && bbox.height > 0.0 {
        (target.width / bbox.width)
            .min(target.height / bbox.height)
            .max(0.0)
    } else {
        0.0
    };

    circles.map(|circle| {
        Circle::new(
            (circle.cx - bbox.cx()) * scale + target.cx(),
            (circle.cy - bbox.cy()) * scale + target.cy(),
            if circle.is_empty() { 0.0 } else { circle.r * scale },
        )
    })
}

fn pair_distance(distances: &[f64; 3], i: usize, j: usize) -> f64 {
    match (i.min(j), i.max(j)) {
        (0, 1) => distances[0],
        (0, 2) => distances[1],
        _ => distances[2],
    }
}

/// Normalized error between traced region areas and requested values.
fn residual(values: &VennValues, radii: [f64; 3], distances: [f64; 3]) -> f64 {
    let centers = calc_coords(radii, distances);
    let circles =
        [0, 1, 2].map(|index| Circle::new(centers[index].0, centers[index].1, radii[index]));
    let areas = region_areas(&circles);
    let squared: f64 = RegionKey::ALL
        .iter()
        .zip(areas)
        .map(|(key, area)| {
            let delta = area - values.get(*key);
            delta * delta
        })
        .sum();
    squared.sqrt() / values.total().max(f64::MIN_POSITIVE)
}

/// Coordinate descent over the three center distances.
///
/// Steps that do not lower the residual are rejected; when a full sweep
/// makes no progress every step is halved.
fn refine_distances(
    values: &VennValues,
    radii: [f64; 3],
    initial: [f64; 3],
    spacing: f64,
    config: &VennSolverConfig,
) -> [f64; 3] {
    let bounds = PAIRS.map(|(i, j)| {
        (
            nested_distance(radii[i], radii[j], config),
            radii[i] + radii[j] + spacing,
        )
    });
    let mut steps = PAIRS.map(|(i, j)| 0.05 * (radii[i] + radii[j]));
    let min_step = config.refine_tolerance * radii.iter().copied().fold(0.0, f64::max);

    let mut distances = initial;
    let mut best = residual(values, radii, distances);
    let mut iterations = 0;

    while iterations < config.refine_max_iterations && best > config.refine_tolerance {
        iterations += 1;
        let mut improved = false;

        for pair in 0..3 {
            for direction in [1.0, -1.0] {
                let mut candidate = distances;
                candidate[pair] = (candidate[pair] + direction * steps[pair])
                    .clamp(bounds[pair].0, bounds[pair].1);
                if candidate[pair] == distances[pair] {
                    continue;
                }
                let score = residual(values, radii, candidate);
                if score < best {
                    best = score;
                    distances = candidate;
                    improved = true;
                    break;
                }
            }
        }

        if !improved {
            for step in &mut steps {
                *step *= 0.5;
            }
            if steps.iter().all(|step| *step < min_step) {
                break;
            }
        }
        trace!(iterations, residual = best, "venn refinement sweep");
    }

    debug!(iterations, residual = best, "venn distances refined");
    distances
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::{VennSolverConfig, calc_bbox, calc_coords, calc_distance, calc_venn, fit_into};
    use crate::core::Frame;
    use crate::venn::geometry::lens_area;
    use crate::venn::{VennMode, VennValues};

    #[test]
    fn distance_hits_requested_overlap() {
        let config = VennSolverConfig::default();
        let d = calc_distance(2.0, 1.5, 3.0, 0.0, &config);
        assert!((lens_area(2.0, 1.5, d) - 3.0).abs() <= 3.0 * 1e-3);
    }

    #[test]
    fn distance_limits_follow_overlap_extremes() {
        let config = VennSolverConfig::default();
        assert!((calc_distance(1.0, 1.0, 0.0, 0.2, &config) - 2.2).abs() <= 1e-12);
        let nested = calc_distance(2.0, 1.0, PI, 0.0, &config);
        assert!(nested < 1.0 && nested > 0.9);
        assert_eq!(calc_distance(1.0, 1.0, PI, 0.0, &config), 0.0);
    }

    #[test]
    fn bisection_tolerance_must_stay_below_one() {
        let config = VennSolverConfig {
            bisection_tolerance: 1.0,
            ..VennSolverConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn coords_keep_requested_distances() {
        let centers = calc_coords([1.0, 1.0, 1.0], [1.0, 1.2, 1.4]);
        let dist = |i: usize, j: usize| {
            (centers[i].0 - centers[j].0).hypot(centers[i].1 - centers[j].1)
        };
        assert!((dist(0, 1) - 1.0).abs() <= 1e-12);
        assert!((dist(0, 2) - 1.2).abs() <= 1e-12);
        assert!((dist(1, 2) - 1.4).abs() <= 1e-12);
    }

    #[test]
    fn coords_skip_empty_leading_circle() {
        let centers = calc_coords([0.0, 1.0, 1.0], [0.0, 0.0, 1.5]);
        let d_bc = (centers[1].0 - centers[2].0).hypot(centers[1].1 - centers[2].1);
        assert!((d_bc - 1.5).abs() <= 1e-12);
    }

    #[test]
    fn zero_input_yields_empty_circles() {
        let values = VennValues::default();
        let circles = calc_venn(&values, VennMode::Full, &VennSolverConfig::default())
            .expect("zero input is valid");
        assert!(circles.iter().all(|circle| circle.r == 0.0));
        assert!(calc_bbox(&circles).is_none());
        let fitted = fit_into(&circles, Frame::new(0.0, 0.0, 100.0, 100.0));
        assert!(fitted.iter().all(|circle| circle.r == 0.0 && circle.cx == 50.0));
    }

    #[test]
    fn none_mode_ignores_magnitudes() {
        let values = VennValues::two_sets(1.0, 500.0, 3.0).expect("values");
        let circles = calc_venn(&values, VennMode::None, &VennSolverConfig::default())
            .expect("layout");
        assert_eq!(circles[0].r, circles[1].r);
        assert_eq!(circles[2].r, 0.0);
    }

    #[test]
    fn invalid_config_fails_fast() {
        let config = VennSolverConfig::default().with_spacing(-1.0);
        let values = VennValues::two_sets(1.0, 1.0, 1.0).expect("values");
        assert!(calc_venn(&values, VennMode::Semi, &config).is_err());
    }
}

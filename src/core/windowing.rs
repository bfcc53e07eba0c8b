use crate::core::DataPoint;

fn ordered(range: (f64, f64)) -> (f64, f64) {
    if range.0 <= range.1 {
        range
    } else {
        (range.1, range.0)
    }
}

/// Returns points whose x coordinate falls inside an inclusive window.
#[must_use]
pub fn points_in_x_window(points: &[DataPoint], start: f64, end: f64) -> Vec<DataPoint> {
    let (min_x, max_x) = ordered((start, end));

    points
        .iter()
        .copied()
        .filter(|point| point.x >= min_x && point.x <= max_x)
        .collect()
}

/// Returns points inside both optional inclusive crops.
#[must_use]
pub fn crop_points(
    points: &[DataPoint],
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
) -> Vec<DataPoint> {
    let x_range = x_range.map(ordered);
    let y_range = y_range.map(ordered);

    points
        .iter()
        .copied()
        .filter(|point| {
            x_range.is_none_or(|(lo, hi)| point.x >= lo && point.x <= hi)
                && y_range.is_none_or(|(lo, hi)| point.y >= lo && point.y <= hi)
        })
        .collect()
}

#[must_use]
pub fn is_sorted_by_x(points: &[DataPoint]) -> bool {
    points.windows(2).all(|pair| pair[0].x <= pair[1].x)
}

/// Linearly interpolates `y` at `x` over points sorted by x.
///
/// Returns `None` outside the covered x range.
#[must_use]
pub fn interpolate_y(points: &[DataPoint], x: f64) -> Option<f64> {
    let index = points.partition_point(|point| point.x < x);
    let right = points.get(index)?;
    if right.x == x {
        return Some(right.y);
    }
    let left = points.get(index.checked_sub(1)?)?;
    let span = right.x - left.x;
    if span == 0.0 {
        return Some(left.y);
    }
    let t = (x - left.x) / span;
    Some(left.y + t * (right.y - left.y))
}

/// Min/max of both coordinates, or `None` for an empty slice.
#[must_use]
pub fn bounds_of(points: &[DataPoint]) -> Option<((f64, f64), (f64, f64))> {
    let first = points.first()?;
    let mut x = (first.x, first.x);
    let mut y = (first.y, first.y);
    for point in &points[1..] {
        x = (x.0.min(point.x), x.1.max(point.x));
        y = (y.0.min(point.y), y.1.max(point.y));
    }
    Some((x, y))
}

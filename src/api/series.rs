use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::api::LegendItem;
use crate::core::{
    DataPoint, Frame, Quad, Scale, bounds_of, crop_points, interpolate_y, is_sorted_by_x,
    points_in_x_window,
};
use crate::error::{ChartError, ChartResult};
use crate::render::{CanvasLayerKind, Color, LinePrimitive, LineStyle, RenderFrame};

/// Default relative padding added around series data on every side.
pub const SERIES_MARGIN: f64 = 0.05;

/// Data extent of a series in both dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesLimits {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

/// Line series drawn inside the data frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    data: Vec<DataPoint>,
    sorted: bool,
    pub title: String,
    /// Relative margins in data units: top and bottom widen y, left and right widen x.
    pub margin: Quad,
    pub x_scale: Scale,
    pub y_scale: Scale,
    pub line: LineStyle,
    pub show_legend: bool,
}

impl Series {
    pub fn new(title: impl Into<String>, data: Vec<DataPoint>) -> ChartResult<Self> {
        if data.iter().any(|point| !point.is_finite()) {
            return Err(ChartError::InvalidData(
                "series points must be finite".to_owned(),
            ));
        }
        let sorted = is_sorted_by_x(&data);
        trace!(count = data.len(), sorted, "series data set");
        Ok(Self {
            data,
            sorted,
            title: title.into(),
            margin: Quad::uniform(SERIES_MARGIN),
            x_scale: Scale::linear(0.0, 1.0)?,
            y_scale: Scale::linear(0.0, 1.0)?,
            line: LineStyle::default(),
            show_legend: true,
        })
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Quad) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.line.color = color;
        self
    }

    #[must_use]
    pub fn data(&self) -> &[DataPoint] {
        &self.data
    }

    /// Data limits, optionally cropped to `x_range` and/or `y_range`.
    ///
    /// Sorted data cropped by x only also covers the values interpolated at
    /// the crop edges. Unless `exact` is set the margins are applied. A
    /// zero-width dimension is widened by 10% of its value.
    #[must_use]
    pub fn get_limits(
        &self,
        x_range: Option<(f64, f64)>,
        y_range: Option<(f64, f64)>,
        exact: bool,
    ) -> Option<SeriesLimits> {
        let bounds = match (x_range, y_range) {
            (None, None) => bounds_of(&self.data),
            (Some((start, end)), None) if self.sorted => {
                let mut window = points_in_x_window(&self.data, start, end);
                for edge in [start, end] {
                    if let Some(y) = interpolate_y(&self.data, edge) {
                        window.push(DataPoint::new(edge, y));
                    }
                }
                bounds_of(&window)
            }
            _ => bounds_of(&crop_points(&self.data, x_range, y_range)),
        };
        let (mut x, mut y) = bounds?;

        if !exact {
            let dx = x.1 - x.0;
            x = (x.0 - dx * self.margin.left, x.1 + dx * self.margin.right);
            let dy = y.1 - y.0;
            y = (y.0 - dy * self.margin.bottom, y.1 + dy * self.margin.top);
        }

        Some(SeriesLimits {
            x: widen_degenerate(x),
            y: widen_degenerate(y),
        })
    }

    #[must_use]
    pub fn legend_items(&self) -> Vec<LegendItem> {
        if !self.show_legend || self.title.is_empty() {
            return Vec::new();
        }
        vec![LegendItem::new(self.title.clone(), self.line.color)]
    }

    pub fn draw(&self, _frame: Frame, target: &mut RenderFrame) -> ChartResult<()> {
        let mut previous: Option<(f64, f64)> = None;
        for point in &self.data {
            let current = (self.x_scale.scale(point.x)?, self.y_scale.scale(point.y)?);
            if let Some((x1, y1)) = previous {
                target.push_line(
                    CanvasLayerKind::Plot,
                    LinePrimitive::new(x1, y1, current.0, current.1, self.line),
                );
            }
            previous = Some(current);
        }
        Ok(())
    }
}

fn widen_degenerate((start, end): (f64, f64)) -> (f64, f64) {
    if start == end {
        let delta = 0.1 * start.abs();
        (start - delta, end + delta)
    } else {
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::Series;
    use crate::core::{DataPoint, Quad};

    fn ramp() -> Series {
        Series::new(
            "ramp",
            (0..=10).map(|i| DataPoint::new(f64::from(i), f64::from(i) * 2.0)).collect(),
        )
        .expect("series")
    }

    #[test]
    fn exact_limits_ignore_margin() {
        let limits = ramp().get_limits(None, None, true).expect("limits");
        assert_eq!(limits.x, (0.0, 10.0));
        assert_eq!(limits.y, (0.0, 20.0));
        let padded = ramp().get_limits(None, None, false).expect("limits");
        assert!((padded.x.0 + 0.5).abs() <= 1e-12);
        assert!((padded.y.1 - 21.0).abs() <= 1e-12);
    }

    #[test]
    fn x_crop_interpolates_edges() {
        let limits = ramp()
            .get_limits(Some((2.5, 4.5)), None, true)
            .expect("limits");
        assert_eq!(limits.x, (2.5, 4.5));
        assert_eq!(limits.y, (5.0, 9.0));
    }

    #[test]
    fn flat_series_is_widened() {
        let series = Series::new("flat", vec![DataPoint::new(0.0, 4.0), DataPoint::new(1.0, 4.0)])
            .expect("series")
            .with_margin(Quad::ZERO);
        let limits = series.get_limits(None, None, false).expect("limits");
        assert!((limits.y.0 - 3.6).abs() <= 1e-12);
        assert!((limits.y.1 - 4.4).abs() <= 1e-12);
    }

    #[test]
    fn empty_crop_has_no_limits() {
        assert!(ramp().get_limits(Some((50.0, 60.0)), None, false).is_none());
        assert!(ramp().get_limits(None, Some((100.0, 200.0)), false).is_none());
    }

    #[test]
    fn non_finite_points_are_rejected() {
        assert!(Series::new("bad", vec![DataPoint::new(f64::NAN, 1.0)]).is_err());
    }
}

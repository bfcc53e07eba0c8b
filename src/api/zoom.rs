use std::collections::VecDeque;

use indexmap::IndexSet;
use tracing::{debug, trace};

use crate::api::{Chart, Graphic, Property};
use crate::error::ChartResult;

/// Dimension of a series an axis is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dimension {
    X,
    Y,
}

impl Dimension {
    const fn property(self) -> Property {
        match self {
            Self::X => Property::XScale,
            Self::Y => Property::YScale,
        }
    }

    const fn other(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

fn ordered((start, end): (f64, f64)) -> (f64, f64) {
    (start.min(end), start.max(end))
}

impl Chart {
    /// Sets the domain of one axis, or of every axis ordered by level.
    ///
    /// With both bounds unset the axis covers its series; a single unset
    /// bound keeps the current value. With `propagate`, axes depending on a
    /// given axis are autoscaled afterwards.
    pub fn zoom(
        &mut self,
        axis: Option<&str>,
        start: Option<f64>,
        end: Option<f64>,
        propagate: bool,
    ) -> ChartResult<()> {
        let mut tags = match axis {
            Some(tag) => {
                self.axis(tag)?;
                vec![tag.to_owned()]
            }
            None => self.axis_tags(),
        };
        let mut levels = Vec::with_capacity(tags.len());
        for tag in &tags {
            levels.push(self.axis(tag)?.config.level);
        }
        let mut order: Vec<usize> = (0..tags.len()).collect();
        order.sort_by_key(|index| levels[*index]);
        tags = order.into_iter().map(|index| tags[index].clone()).collect();

        for tag in &tags {
            let (mut lo, mut hi) = (start, end);
            if lo.is_none() && hi.is_none() {
                if let Some((series_lo, series_hi)) = self.series_limits(tag, false)? {
                    lo = Some(series_lo);
                    hi = Some(series_hi);
                }
            }
            let (current_lo, current_hi) = self.axis(tag)?.scale().domain();
            self.finalize_axis(
                tag,
                Some(lo.unwrap_or(current_lo)),
                Some(hi.unwrap_or(current_hi)),
            )?;
        }

        if propagate {
            if let Some(tag) = axis {
                self.finalize_zoom(&[tag])?;
            }
        }
        Ok(())
    }

    /// Autoscales every axis that depends on `tags`, transitively.
    ///
    /// A dependent axis has a higher level and shares a visible series with
    /// an already changed axis. Each axis is finalized at most once, with
    /// its series limits cropped to the domains of its lower-level partners.
    pub fn finalize_zoom(&mut self, tags: &[&str]) -> ChartResult<()> {
        let mut changed: IndexSet<String> = IndexSet::new();
        for tag in tags {
            self.axis(tag)?;
            changed.insert((*tag).to_owned());
        }
        let mut queue: VecDeque<String> = changed.iter().cloned().collect();

        while let Some(parent) = queue.pop_front() {
            for child in self.child_axes(&parent)? {
                if changed.contains(&child) {
                    trace!(parent = %parent, child = %child, "axis already finalized");
                    continue;
                }
                let config = &self.axis(&child)?.config;
                if config.is_static || !config.autoscale {
                    continue;
                }
                let (start, end) = match self.series_limits(&child, true)? {
                    Some((start, end)) => (Some(start), Some(end)),
                    None => (None, None),
                };
                self.finalize_axis(&child, start, end)?;
                changed.insert(child.clone());
                queue.push_back(child);
            }
        }
        debug!(changed = changed.len(), "zoom finalized");
        Ok(())
    }

    /// Applies the axis policies to a requested domain and sets it.
    ///
    /// Steps, in order: fall back to the series range (or `empty_range`)
    /// when a bound is missing, keep inside the series range with
    /// `check_limits`, widen to `includes`, replace a `(0, 0)` range by
    /// `(0, 1)`, mirror around zero with `symmetric`, then widen any other
    /// zero-width range by 10% of its value.
    pub fn finalize_axis(
        &mut self,
        tag: &str,
        start: Option<f64>,
        end: Option<f64>,
    ) -> ChartResult<(f64, f64)> {
        let config = self.axis(tag)?.config.clone();
        let series_range = self.series_limits(tag, false)?;

        let (mut start, mut end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            _ => series_range.unwrap_or(config.empty_range),
        };

        if config.check_limits {
            if let Some((range_min, range_max)) = series_range {
                if start < range_min && end > range_max {
                    start = range_min;
                    end = range_max;
                } else if start < range_min {
                    let shift = range_min - start;
                    start += shift;
                    end += shift;
                } else if end > range_max {
                    let shift = end - range_max;
                    start -= shift;
                    end -= shift;
                }
            }
        }

        if !config.includes.is_empty() {
            let include_min = config.includes.iter().copied().fold(f64::INFINITY, f64::min);
            let include_max = config.includes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            start = start.min(include_min);
            end = end.max(include_max);
        }

        if start == end && start == 0.0 {
            end = 1.0;
        }

        if config.symmetric {
            let maximum = start.abs().max(end.abs());
            start = -maximum;
            end = maximum;
        }

        if start == end {
            start -= 0.1 * start.abs();
            end += 0.1 * end.abs();
        }

        self.axis_mut(tag)?.zoom(Some(start), Some(end))?;
        trace!(tag, start, end, "axis finalized");
        Ok((start, end))
    }

    /// Visible series mapped onto `axis` and the dimension they use it for.
    fn axis_series(&self, axis: &str) -> Vec<(String, Dimension)> {
        let mut linked = Vec::new();
        for graphic in self.graphics.values() {
            if !graphic.visible || graphic.as_series().is_none() {
                continue;
            }
            for dimension in [Dimension::X, Dimension::Y] {
                let source = self.mappings.source_of(&graphic.tag, dimension.property());
                let linked_here = source.is_some_and(|source| {
                    source.tag == axis && source.property == Property::Scale
                });
                if linked_here {
                    linked.push((graphic.tag.clone(), dimension));
                }
            }
        }
        linked
    }

    /// Axis mapped onto the other dimension of `series`.
    fn partner_axis(&self, series: &str, dimension: Dimension) -> Option<String> {
        self.mappings
            .source_of(series, dimension.other().property())
            .filter(|source| source.property == Property::Scale)
            .filter(|source| self.graphics.get(&source.tag).and_then(Graphic::as_axis).is_some())
            .map(|source| source.tag.clone())
    }

    /// Union of the limits of every visible series mapped onto `axis`.
    ///
    /// With `cropped`, each series is first cropped to the domain of its
    /// partner axis when that axis has a lower level.
    fn series_limits(&self, axis: &str, cropped: bool) -> ChartResult<Option<(f64, f64)>> {
        let level = self.axis(axis)?.config.level;
        let mut limits: Option<(f64, f64)> = None;

        for (series_tag, dimension) in self.axis_series(axis) {
            let Some(series) = self.graphics.get(&series_tag).and_then(Graphic::as_series) else {
                continue;
            };
            let mut crop = None;
            if cropped {
                if let Some(partner) = self.partner_axis(&series_tag, dimension) {
                    let partner = self.axis(&partner)?;
                    if partner.config.level < level {
                        crop = Some(ordered(partner.scale().domain()));
                    }
                }
            }
            let found = match dimension {
                Dimension::X => series.get_limits(None, crop, false),
                Dimension::Y => series.get_limits(crop, None, false),
            };
            let Some(found) = found else {
                continue;
            };
            let (lo, hi) = match dimension {
                Dimension::X => found.x,
                Dimension::Y => found.y,
            };
            limits = Some(limits.map_or((lo, hi), |(start, end)| (start.min(lo), end.max(hi))));
        }
        Ok(limits)
    }

    /// Higher-level axes sharing a visible series with `parent`.
    fn child_axes(&self, parent: &str) -> ChartResult<Vec<String>> {
        let level = self.axis(parent)?.config.level;
        let mut children: IndexSet<String> = IndexSet::new();
        for (series_tag, dimension) in self.axis_series(parent) {
            if let Some(partner) = self.partner_axis(&series_tag, dimension) {
                if self.axis(&partner)?.config.level > level {
                    children.insert(partner);
                }
            }
        }
        Ok(children.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{Axis, Chart, ChartConfig, Graphic, Series};
    use crate::core::{DataPoint, Edge, Quad};

    fn chart_with_ramp() -> Chart {
        let mut chart = Chart::new(ChartConfig::default()).expect("chart");
        chart
            .add(Graphic::new("x", Axis::linear(Edge::Bottom).expect("x").with_level(1)))
            .expect("add x");
        chart
            .add(Graphic::new(
                "y",
                Axis::linear(Edge::Left).expect("y").with_autoscale(true),
            ))
            .expect("add y");
        let series = Series::new(
            "ramp",
            (0..=10).map(|i| DataPoint::new(f64::from(i), f64::from(i) * 10.0)).collect(),
        )
        .expect("series")
        .with_margin(Quad::ZERO);
        chart.add(Graphic::new("ramp", series)).expect("add series");
        chart.plot("ramp", "x", "y").expect("plot");
        chart
    }

    #[test]
    fn full_zoom_covers_series() {
        let mut chart = chart_with_ramp();
        chart.zoom(None, None, None, true).expect("zoom");
        assert_eq!(chart.axis("x").expect("x").scale().domain(), (0.0, 10.0));
        assert_eq!(chart.axis("y").expect("y").scale().domain(), (0.0, 100.0));
    }

    #[test]
    fn zooming_parent_autoscales_child() {
        let mut chart = chart_with_ramp();
        chart.zoom(Some("x"), Some(2.0), Some(4.0), true).expect("zoom");
        assert_eq!(chart.axis("y").expect("y").scale().domain(), (20.0, 40.0));
    }

    #[test]
    fn static_child_is_left_alone() {
        let mut chart = chart_with_ramp();
        chart.axis_mut("y").expect("y").config.is_static = true;
        chart.zoom(Some("y"), Some(-5.0), Some(5.0), false).expect("zoom y");
        chart.zoom(Some("x"), Some(2.0), Some(4.0), true).expect("zoom x");
        assert_eq!(chart.axis("y").expect("y").scale().domain(), (-5.0, 5.0));
    }

    #[test]
    fn finalize_applies_policies_in_order() {
        let mut chart = chart_with_ramp();
        chart.axis_mut("y").expect("y").config.symmetric = true;
        let range = chart.finalize_axis("y", Some(-2.0), Some(5.0)).expect("symmetric");
        assert_eq!(range, (-5.0, 5.0));

        let axis = chart.axis_mut("y").expect("y");
        axis.config.symmetric = false;
        axis.config.includes = vec![150.0];
        let range = chart.finalize_axis("y", Some(0.0), Some(50.0)).expect("includes");
        assert_eq!(range, (0.0, 150.0));

        let range = chart.finalize_axis("x", Some(0.0), Some(0.0)).expect("zero");
        assert_eq!(range, (0.0, 1.0));
        let range = chart.finalize_axis("x", Some(5.0), Some(5.0)).expect("flat");
        assert!((range.0 - 4.5).abs() <= 1e-12 && (range.1 - 5.5).abs() <= 1e-12);
    }

    #[test]
    fn check_limits_shifts_window_into_data() {
        let mut chart = chart_with_ramp();
        chart.axis_mut("x").expect("x").config.check_limits = true;
        let range = chart.finalize_axis("x", Some(-2.0), Some(3.0)).expect("shift");
        assert_eq!(range, (0.0, 5.0));
        let range = chart.finalize_axis("x", Some(-2.0), Some(30.0)).expect("clamp");
        assert_eq!(range, (0.0, 10.0));
    }
}

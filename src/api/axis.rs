use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{Edge, Frame, Quad, Scale, Ticker};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CanvasLayerKind, Color, LinePrimitive, LineStyle, RenderFrame, TextHAlign, TextMeasurer,
    TextPrimitive, TextStyle, TextVAlign,
};

use super::decorations::DECORATION_MARGIN;

/// Display and autoscale settings of an axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    pub position: Option<Edge>,
    /// Lower levels are parents; higher levels autoscale off their parents.
    pub level: i32,
    /// Static axes never follow zoom propagation.
    #[serde(rename = "static")]
    pub is_static: bool,
    pub autoscale: bool,
    pub symmetric: bool,
    pub check_limits: bool,
    pub includes: Vec<f64>,
    pub empty_range: (f64, f64),
    pub margin: Quad,
    pub title: String,
    pub title_offset: f64,
    pub label_offset: f64,
    pub label_overlap: bool,
    pub major_tick_size: f64,
    pub major_tick_offset: f64,
    pub minor_tick_size: f64,
    pub minor_tick_offset: f64,
    pub show_line: bool,
    pub show_major_ticks: bool,
    pub show_minor_ticks: bool,
    pub show_labels: bool,
    pub show_title: bool,
    pub line: LineStyle,
    pub label_style: TextStyle,
    pub title_style: TextStyle,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            position: None,
            level: 2,
            is_static: false,
            autoscale: false,
            symmetric: false,
            check_limits: false,
            includes: Vec::new(),
            empty_range: (0.0, 1.0),
            margin: Quad::uniform(DECORATION_MARGIN),
            title: String::new(),
            title_offset: 5.0,
            label_offset: 3.0,
            label_overlap: false,
            major_tick_size: 6.0,
            major_tick_offset: 0.0,
            minor_tick_size: 3.0,
            minor_tick_offset: 0.0,
            show_line: true,
            show_major_ticks: true,
            show_minor_ticks: true,
            show_labels: true,
            show_title: true,
            line: LineStyle::default(),
            label_style: TextStyle::default(),
            title_style: TextStyle::new(12.0, Color::rgb(0.2, 0.2, 0.2)),
        }
    }
}

/// Scale plus ticker attached to one chart edge.
///
/// The ticker domain always mirrors the scale domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub config: AxisConfig,
    scale: Scale,
    ticker: Ticker,
}

impl Axis {
    fn with_parts(
        position: Edge,
        scale: Scale,
        ticker: Ticker,
        empty_range: (f64, f64),
    ) -> ChartResult<Self> {
        let config = AxisConfig {
            position: Some(position),
            empty_range,
            ..AxisConfig::default()
        };
        let mut axis = Self {
            config,
            scale: scale.clone(),
            ticker,
        };
        axis.set_scale(scale)?;
        Ok(axis)
    }

    pub fn linear(position: Edge) -> ChartResult<Self> {
        Self::with_parts(position, Scale::linear(0.0, 1.0)?, Ticker::linear(), (0.0, 1.0))
    }

    pub fn log(position: Edge, base: f64) -> ChartResult<Self> {
        Self::with_parts(position, Scale::log(1.0, 10.0, base)?, Ticker::log(base), (1.0, 10.0))
    }

    /// Categorical axis: labels sit on integer slots, minors between them.
    pub fn ordinal<I, S>(position: Edge, labels: I) -> ChartResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let scale = Scale::ordinal(labels)?;
        let labels = scale.labels().unwrap_or_default();
        let ticker = Ticker::for_categories(&labels);
        let empty_range = scale.domain();
        Self::with_parts(position, scale, ticker, empty_range)
    }

    /// Linear axis over unix seconds with calendar labels.
    pub fn time(position: Edge) -> ChartResult<Self> {
        Self::with_parts(position, Scale::linear(0.0, 86_400.0)?, Ticker::time(), (0.0, 86_400.0))
    }

    #[must_use]
    pub fn with_level(mut self, level: i32) -> Self {
        self.config.level = level;
        self
    }

    #[must_use]
    pub fn with_autoscale(mut self, autoscale: bool) -> Self {
        self.config.autoscale = autoscale;
        self
    }

    #[must_use]
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.config.is_static = is_static;
        self
    }

    #[must_use]
    pub fn with_symmetric(mut self, symmetric: bool) -> Self {
        self.config.symmetric = symmetric;
        self
    }

    #[must_use]
    pub fn with_check_limits(mut self, check_limits: bool) -> Self {
        self.config.check_limits = check_limits;
        self
    }

    #[must_use]
    pub fn with_includes(mut self, includes: Vec<f64>) -> Self {
        self.config.includes = includes;
        self
    }

    #[must_use]
    pub fn with_empty_range(mut self, start: f64, end: f64) -> Self {
        self.config.empty_range = (start, end);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    #[must_use]
    pub fn position(&self) -> Option<Edge> {
        self.config.position
    }

    #[must_use]
    pub fn scale(&self) -> &Scale {
        &self.scale
    }

    #[must_use]
    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Replaces the scale; fails fast when the current ticker cannot label it.
    pub fn set_scale(&mut self, scale: Scale) -> ChartResult<()> {
        if !self.ticker.supports(&scale) {
            return Err(ChartError::IncompatibleTicker {
                scale: scale.name(),
                ticker: self.ticker.name(),
            });
        }
        let (start, end) = scale.domain();
        self.scale = scale;
        self.ticker.set_domain(start, end);
        Ok(())
    }

    /// Replaces the ticker; fails fast when it cannot label the current scale.
    pub fn set_ticker(&mut self, mut ticker: Ticker) -> ChartResult<()> {
        if !ticker.supports(&self.scale) {
            return Err(ChartError::IncompatibleTicker {
                scale: self.scale.name(),
                ticker: ticker.name(),
            });
        }
        let (start, end) = self.scale.domain();
        ticker.set_domain(start, end);
        self.ticker = ticker;
        Ok(())
    }

    /// Sets the domain; `None` keeps the current bound.
    pub fn zoom(&mut self, start: Option<f64>, end: Option<f64>) -> ChartResult<()> {
        let (current_start, current_end) = self.scale.domain();
        let start = start.unwrap_or(current_start);
        let end = end.unwrap_or(current_end);
        self.scale.set_domain(start, end)?;
        self.ticker.set_domain(start, end);
        trace!(start, end, "axis zoomed");
        Ok(())
    }

    /// Current domain, or the bound device range when `device` is set.
    #[must_use]
    pub fn get_range(&self, device: bool) -> (f64, f64) {
        if device {
            self.scale.range()
        } else {
            self.scale.domain()
        }
    }

    /// Value formatted the way the axis labels it, magnitude suffix included.
    #[must_use]
    pub fn get_tooltip(&self, value: f64) -> String {
        format!("{}{}", self.ticker.format(value), self.ticker.suffix())
    }

    /// Binds the device range to the axis frame; vertical axes run upward.
    pub fn bind_range(&mut self, frame: Frame) -> ChartResult<()> {
        match self.config.position {
            Some(Edge::Left | Edge::Right) => self.scale.set_range(frame.y2(), frame.y1()),
            Some(Edge::Top | Edge::Bottom) => self.scale.set_range(frame.x1(), frame.x2()),
            None => Err(ChartError::InvalidConfig(
                "axis position must be set before binding its range".to_owned(),
            )),
        }
    }

    fn ticks_extent(&self) -> f64 {
        let major = if self.config.show_major_ticks {
            self.config.major_tick_size + self.config.major_tick_offset
        } else {
            0.0
        };
        let minor = if self.config.show_minor_ticks {
            self.config.minor_tick_size + self.config.minor_tick_offset
        } else {
            0.0
        };
        major.max(minor)
    }

    fn labels_extent(&self, measurer: &dyn TextMeasurer) -> f64 {
        if !self.config.show_labels {
            return 0.0;
        }
        let longest = self
            .ticker
            .labels()
            .into_iter()
            .max_by_key(|label| label.chars().count());
        let Some(label) = longest else {
            return self.config.label_offset;
        };
        let (width, height) = measurer.measure(&label, &self.config.label_style);
        let size = if self.config.position.is_some_and(Edge::is_horizontal) {
            height
        } else {
            width
        };
        size + self.config.label_offset
    }

    fn title_extent(&self, measurer: &dyn TextMeasurer) -> f64 {
        if !self.config.show_title || self.config.title.is_empty() {
            return 0.0;
        }
        self.config.title_offset + measurer.measure(&self.config.title, &self.config.title_style).1
    }

    /// Space needed perpendicular to the edge for ticks, labels and title.
    #[must_use]
    pub fn get_extent(&self, measurer: &dyn TextMeasurer) -> f64 {
        self.ticks_extent() + self.labels_extent(measurer) + self.title_extent(measurer)
    }

    pub fn draw(
        &self,
        frame: Frame,
        target: &mut RenderFrame,
        measurer: &dyn TextMeasurer,
    ) -> ChartResult<()> {
        let Some(edge) = self.config.position else {
            return Ok(());
        };
        let config = &self.config;
        // Baseline on the data-frame side and the outward direction.
        let (base, outward) = match edge {
            Edge::Left => (frame.x2(), -1.0),
            Edge::Right => (frame.x1(), 1.0),
            Edge::Top => (frame.y2(), -1.0),
            Edge::Bottom => (frame.y1(), 1.0),
        };
        let segment = |along: f64, from: f64, to: f64| {
            let (a, b) = (base + outward * from, base + outward * to);
            if edge.is_horizontal() {
                LinePrimitive::new(along, a, along, b, config.line)
            } else {
                LinePrimitive::new(a, along, b, along, config.line)
            }
        };

        if config.show_line {
            let line = if edge.is_horizontal() {
                LinePrimitive::new(frame.x1(), base, frame.x2(), base, config.line)
            } else {
                LinePrimitive::new(base, frame.y1(), base, frame.y2(), config.line)
            };
            target.push_line(CanvasLayerKind::Decoration, line);
        }

        if config.show_minor_ticks {
            for tick in self.ticker.minor_ticks() {
                let along = self.scale.scale(tick)?;
                target.push_line(
                    CanvasLayerKind::Decoration,
                    segment(
                        along,
                        config.minor_tick_offset,
                        config.minor_tick_offset + config.minor_tick_size,
                    ),
                );
            }
        }

        let majors = self.ticker.major_ticks();
        if config.show_major_ticks {
            for tick in &majors {
                let along = self.scale.scale(*tick)?;
                target.push_line(
                    CanvasLayerKind::Decoration,
                    segment(
                        along,
                        config.major_tick_offset,
                        config.major_tick_offset + config.major_tick_size,
                    ),
                );
            }
        }

        let label_distance = self.ticks_extent() + config.label_offset;
        if config.show_labels {
            let (h_align, v_align) = match edge {
                Edge::Left => (TextHAlign::Right, TextVAlign::Middle),
                Edge::Right => (TextHAlign::Left, TextVAlign::Middle),
                Edge::Top => (TextHAlign::Center, TextVAlign::Bottom),
                Edge::Bottom => (TextHAlign::Center, TextVAlign::Top),
            };
            let mut placed: Vec<(f64, f64)> = Vec::new();
            for (tick, label) in majors.iter().zip(self.ticker.labels()) {
                let along = self.scale.scale(*tick)?;
                let (width, height) = measurer.measure(&label, &config.label_style);
                let half = 0.5 * if edge.is_horizontal() { width } else { height };
                let span = (along - half, along + half);
                if !config.label_overlap && placed.iter().any(|other| spans_overlap(*other, span)) {
                    continue;
                }
                placed.push(span);
                let across = base + outward * label_distance;
                let (x, y) = if edge.is_horizontal() { (along, across) } else { (across, along) };
                target.push_text(
                    CanvasLayerKind::Decoration,
                    TextPrimitive::new(label, x, y, config.label_style, h_align, v_align),
                );
            }
        }

        if config.show_title && !config.title.is_empty() {
            let title_distance = label_distance + self.labels_extent(measurer) - config.label_offset
                + config.title_offset;
            let across = base + outward * title_distance;
            let (x, y, h_align, v_align) = match edge {
                Edge::Left => (across, frame.cy(), TextHAlign::Right, TextVAlign::Middle),
                Edge::Right => (across, frame.cy(), TextHAlign::Left, TextVAlign::Middle),
                Edge::Top => (frame.cx(), across, TextHAlign::Center, TextVAlign::Bottom),
                Edge::Bottom => (frame.cx(), across, TextHAlign::Center, TextVAlign::Top),
            };
            target.push_text(
                CanvasLayerKind::Decoration,
                TextPrimitive::new(
                    config.title.clone(),
                    x,
                    y,
                    config.title_style,
                    h_align,
                    v_align,
                ),
            );
        }

        Ok(())
    }
}

fn spans_overlap(a: (f64, f64), b: (f64, f64)) -> bool {
    let (a0, a1) = (a.0.min(a.1), a.0.max(a.1));
    let (b0, b1) = (b.0.min(b.1), b.0.max(b.1));
    a0 < b1 && b0 < a1
}

#[cfg(test)]
mod tests {
    use super::Axis;
    use crate::core::{Edge, Frame, Scale, Ticker};
    use crate::error::ChartError;
    use crate::render::HeuristicTextMeasurer;

    #[test]
    fn log_ticker_rejected_for_linear_axis() {
        let mut axis = Axis::linear(Edge::Bottom).expect("axis");
        let err = axis.set_ticker(Ticker::log(10.0)).expect_err("incompatible");
        assert!(matches!(err, ChartError::IncompatibleTicker { .. }));
        let mut log_axis = Axis::log(Edge::Left, 10.0).expect("axis");
        assert!(log_axis.set_scale(Scale::ordinal(["a"]).expect("scale")).is_err());
    }

    #[test]
    fn zoom_keeps_missing_bound() {
        let mut axis = Axis::linear(Edge::Bottom).expect("axis");
        axis.zoom(Some(2.0), Some(8.0)).expect("zoom");
        axis.zoom(None, Some(12.0)).expect("zoom");
        assert_eq!(axis.get_range(false), (2.0, 12.0));
        assert_eq!(axis.ticker().domain(), (2.0, 12.0));
    }

    #[test]
    fn vertical_axis_binds_inverted_range() {
        let mut axis = Axis::linear(Edge::Left).expect("axis");
        axis.bind_range(Frame::new(0.0, 10.0, 40.0, 200.0)).expect("bind");
        assert_eq!(axis.get_range(true), (210.0, 10.0));
    }

    #[test]
    fn extent_accounts_for_title() {
        let measurer = HeuristicTextMeasurer::default();
        let axis = Axis::linear(Edge::Bottom).expect("axis");
        let bare = axis.get_extent(&measurer);
        // ticks 6 + label height 11 + offset 3
        assert!((bare - 20.0).abs() <= 1e-12);
        let titled = axis.with_title("Time").get_extent(&measurer);
        assert!((titled - bare - 17.0).abs() <= 1e-12);
    }

    #[test]
    fn ordinal_axis_labels_categories() {
        let axis = Axis::ordinal(Edge::Bottom, ["red", "green", "blue"]).expect("axis");
        assert_eq!(axis.get_range(false), (-0.5, 2.5));
        assert_eq!(axis.ticker().labels(), vec!["red", "green", "blue"]);
        assert_eq!(axis.get_tooltip(1.0), "green");
    }
}

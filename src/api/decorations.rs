use serde::{Deserialize, Serialize};

use crate::core::{Edge, Frame, Quad, Scale};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    CanvasLayerKind, Color, FillStyle, LineStyle, RectPrimitive, RenderFrame, TextHAlign,
    TextMeasurer, TextPrimitive, TextStyle, TextVAlign,
};

/// Default margin around every out-of-frame decoration.
pub const DECORATION_MARGIN: f64 = 10.0;

/// Chart title drawn along one edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Title {
    pub text: String,
    pub position: Option<Edge>,
    pub margin: Quad,
    pub style: TextStyle,
}

impl Default for Title {
    fn default() -> Self {
        Self {
            text: String::new(),
            position: Some(Edge::Top),
            margin: Quad::uniform(DECORATION_MARGIN),
            style: TextStyle::new(13.0, Color::rgb(0.2, 0.2, 0.2)),
        }
    }
}

impl Title {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Edge) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn extent(&self, measurer: &dyn TextMeasurer) -> f64 {
        if self.text.is_empty() {
            return 0.0;
        }
        measurer.measure(&self.text, &self.style).1
    }

    pub fn draw(&self, frame: Frame, target: &mut RenderFrame) {
        if self.text.is_empty() {
            return;
        }
        target.push_text(
            CanvasLayerKind::Decoration,
            TextPrimitive::new(
                self.text.clone(),
                frame.cx(),
                frame.cy(),
                self.style,
                TextHAlign::Center,
                TextVAlign::Middle,
            ),
        );
    }
}

/// One legend entry: a colored marker and its text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendItem {
    pub text: String,
    pub color: Color,
}

impl LegendItem {
    #[must_use]
    pub fn new(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendOrientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Legend box outside the data frame.
///
/// Non-static legends are refilled from the chart's in-frame graphics on
/// every draw; static legends keep the items added by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Legend {
    pub items: Vec<LegendItem>,
    pub is_static: bool,
    pub position: Option<Edge>,
    pub orientation: LegendOrientation,
    pub margin: Quad,
    pub padding: Quad,
    pub spacing: f64,
    pub marker_size: f64,
    pub style: TextStyle,
    pub line: LineStyle,
    pub fill: FillStyle,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_static: false,
            position: Some(Edge::Right),
            orientation: LegendOrientation::Vertical,
            margin: Quad::uniform(DECORATION_MARGIN),
            padding: Quad::uniform(5.0),
            spacing: 5.0,
            marker_size: 12.0,
            style: TextStyle::default(),
            line: LineStyle::new(1.0, Color::rgb(0.867, 0.867, 0.867)),
            fill: FillStyle::new(Color::rgba(1.0, 1.0, 1.0, 0.8)),
        }
    }
}

impl Legend {
    #[must_use]
    pub fn with_position(mut self, position: Edge) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: LegendOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Adds a hand-made item; only static legends accept them.
    pub fn add(&mut self, item: LegendItem) -> ChartResult<()> {
        if !self.is_static {
            return Err(ChartError::InvalidConfig(
                "cannot add items to a non-static legend".to_owned(),
            ));
        }
        self.items.push(item);
        Ok(())
    }

    /// Replaces collected items unless the legend is static.
    pub fn collect(&mut self, items: Vec<LegendItem>) {
        if !self.is_static {
            self.items = items;
        }
    }

    fn item_size(&self, item: &LegendItem, measurer: &dyn TextMeasurer) -> (f64, f64) {
        let (width, height) = measurer.measure(&item.text, &self.style);
        (
            self.marker_size + self.spacing + width,
            height.max(self.marker_size),
        )
    }

    /// Outer size of the legend box, `None` without items.
    #[must_use]
    pub fn bbox(&self, measurer: &dyn TextMeasurer) -> Option<(f64, f64)> {
        if self.items.is_empty() {
            return None;
        }
        let sizes: Vec<(f64, f64)> = self
            .items
            .iter()
            .map(|item| self.item_size(item, measurer))
            .collect();
        let gaps = self.spacing * (sizes.len() - 1) as f64;
        let (content_w, content_h) = match self.orientation {
            LegendOrientation::Vertical => (
                sizes.iter().map(|size| size.0).fold(0.0, f64::max),
                sizes.iter().map(|size| size.1).sum::<f64>() + gaps,
            ),
            LegendOrientation::Horizontal => (
                sizes.iter().map(|size| size.0).sum::<f64>() + gaps,
                sizes.iter().map(|size| size.1).fold(0.0, f64::max),
            ),
        };
        Some((
            content_w + self.padding.left + self.padding.right,
            content_h + self.padding.top + self.padding.bottom,
        ))
    }

    #[must_use]
    pub fn extent(&self, measurer: &dyn TextMeasurer) -> f64 {
        let Some((width, height)) = self.bbox(measurer) else {
            return 0.0;
        };
        match self.position {
            Some(edge) if edge.is_horizontal() => height,
            _ => width,
        }
    }

    pub fn draw(&self, frame: Frame, target: &mut RenderFrame, measurer: &dyn TextMeasurer) {
        let Some((width, height)) = self.bbox(measurer) else {
            return;
        };
        let (x, y) = match self.position.unwrap_or(Edge::Right) {
            Edge::Top => (frame.cx() - 0.5 * width, frame.y1()),
            Edge::Bottom => (frame.cx() - 0.5 * width, frame.y2() - height),
            Edge::Left => (frame.x1(), frame.cy() - 0.5 * height),
            Edge::Right => (frame.x2() - width, frame.cy() - 0.5 * height),
        };
        target.push_rect(
            CanvasLayerKind::Decoration,
            RectPrimitive::filled(x, y, width, height, self.fill.color).with_stroke(self.line),
        );

        let mut cursor = (x + self.padding.left, y + self.padding.top);
        for item in &self.items {
            let (item_w, item_h) = self.item_size(item, measurer);
            let middle = cursor.1 + 0.5 * item_h;
            target.push_rect(
                CanvasLayerKind::Decoration,
                RectPrimitive::filled(
                    cursor.0,
                    middle - 0.5 * self.marker_size,
                    self.marker_size,
                    self.marker_size,
                    item.color,
                ),
            );
            if !item.text.is_empty() {
                target.push_text(
                    CanvasLayerKind::Decoration,
                    TextPrimitive::new(
                        item.text.clone(),
                        cursor.0 + self.marker_size + self.spacing,
                        middle,
                        self.style,
                        TextHAlign::Left,
                        TextVAlign::Middle,
                    ),
                );
            }
            match self.orientation {
                LegendOrientation::Vertical => cursor.1 += item_h + self.spacing,
                LegendOrientation::Horizontal => cursor.0 += item_w + self.spacing,
            }
        }
    }
}

/// Gradient bar translating values of its scale into colors.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBar {
    pub position: Option<Edge>,
    pub margin: Quad,
    pub thickness: f64,
    pub scale: Scale,
    pub gradient: Vec<Color>,
    pub steps: usize,
}

impl ColorBar {
    pub fn new(scale: Scale, gradient: Vec<Color>) -> ChartResult<Self> {
        if gradient.is_empty() {
            return Err(ChartError::InvalidConfig(
                "color bar gradient needs at least one color".to_owned(),
            ));
        }
        Ok(Self {
            position: Some(Edge::Right),
            margin: Quad::uniform(DECORATION_MARGIN),
            thickness: 20.0,
            scale,
            gradient,
            steps: 64,
        })
    }

    #[must_use]
    pub fn with_position(mut self, position: Edge) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn extent(&self) -> f64 {
        self.thickness.max(0.0)
    }

    /// Color for a value in data units.
    pub fn color_at(&self, value: f64) -> ChartResult<Color> {
        let norm = self.scale.normalize(value)?;
        Ok(gradient_at(&self.gradient, norm))
    }

    pub fn draw(&self, frame: Frame, target: &mut RenderFrame) {
        let steps = self.steps.max(1);
        let vertical = !self.position.is_some_and(Edge::is_horizontal);
        for step in 0..steps {
            let t0 = step as f64 / steps as f64;
            let t1 = (step + 1) as f64 / steps as f64;
            let color = gradient_at(&self.gradient, 0.5 * (t0 + t1));
            let rect = if vertical {
                // Low values at the bottom.
                let y = frame.y2() - t1 * frame.height;
                RectPrimitive::filled(frame.x, y, frame.width, frame.height / steps as f64, color)
            } else {
                let x = frame.x1() + t0 * frame.width;
                RectPrimitive::filled(x, frame.y, frame.width / steps as f64, frame.height, color)
            };
            target.push_rect(CanvasLayerKind::Decoration, rect);
        }
    }
}

fn gradient_at(gradient: &[Color], t: f64) -> Color {
    match gradient {
        [] => Color::BLACK,
        [only] => *only,
        _ => {
            let scaled = t.clamp(0.0, 1.0) * (gradient.len() - 1) as f64;
            let index = (scaled.floor() as usize).min(gradient.len() - 2);
            gradient[index].lerp(gradient[index + 1], scaled - index as f64)
        }
    }
}

/// Bar showing where the current domain of a scale sits within a full range.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionBar {
    pub position: Option<Edge>,
    pub margin: Quad,
    pub thickness: f64,
    pub scale: Scale,
    pub full_range: (f64, f64),
    pub track: FillStyle,
    pub thumb: FillStyle,
}

impl PositionBar {
    pub fn new(scale: Scale, full_range: (f64, f64)) -> ChartResult<Self> {
        if !full_range.0.is_finite() || !full_range.1.is_finite() {
            return Err(ChartError::InvalidData(
                "position bar full range must be finite".to_owned(),
            ));
        }
        Ok(Self {
            position: Some(Edge::Bottom),
            margin: Quad::uniform(DECORATION_MARGIN),
            thickness: 7.0,
            scale,
            full_range,
            track: FillStyle::new(Color::rgb(0.8, 0.8, 0.8)),
            thumb: FillStyle::new(Color::rgba(0.0, 0.0, 0.0, 0.667)),
        })
    }

    #[must_use]
    pub fn with_position(mut self, position: Edge) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn extent(&self) -> f64 {
        self.thickness.max(0.0)
    }

    /// Visible part of the full range as `(start, end)` fractions.
    #[must_use]
    pub fn visible_fraction(&self) -> (f64, f64) {
        let (full_lo, full_hi) = ordered(self.full_range);
        let (lo, hi) = ordered(self.scale.domain());
        let length = full_hi - full_lo;
        if length > 0.0 {
            ((lo - full_lo) / length, (hi - full_lo) / length)
        } else if full_lo < lo {
            (1.0, 1.0)
        } else {
            (0.0, 0.0)
        }
    }

    pub fn draw(&self, frame: Frame, target: &mut RenderFrame) {
        target.push_rect(
            CanvasLayerKind::Decoration,
            RectPrimitive::filled(frame.x, frame.y, frame.width, frame.height, self.track.color),
        );
        let (start, end) = self.visible_fraction();
        let (start, end) = (start.clamp(0.0, 1.0), end.clamp(0.0, 1.0));
        let rect = if self.position.is_some_and(Edge::is_horizontal) {
            RectPrimitive::filled(
                frame.x1() + start * frame.width,
                frame.y,
                (end - start) * frame.width,
                frame.height,
                self.thumb.color,
            )
        } else {
            RectPrimitive::filled(
                frame.x,
                frame.y2() - end * frame.height,
                frame.width,
                (end - start) * frame.height,
                self.thumb.color,
            )
        };
        target.push_rect(CanvasLayerKind::Decoration, rect);
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::{ColorBar, Legend, LegendItem, LegendOrientation, PositionBar, Title};
    use crate::core::{Edge, Scale};
    use crate::render::{Color, HeuristicTextMeasurer};

    #[test]
    fn legend_extent_follows_edge() {
        let measurer = HeuristicTextMeasurer::default();
        let mut legend = Legend::default();
        assert_eq!(legend.extent(&measurer), 0.0);
        legend.collect(vec![LegendItem::new("alpha", Color::BLACK)]);
        let (width, height) = legend.bbox(&measurer).expect("bbox");
        assert_eq!(legend.extent(&measurer), width);
        let legend = legend
            .with_position(Edge::Bottom)
            .with_orientation(LegendOrientation::Horizontal);
        assert_eq!(legend.extent(&measurer), height);
    }

    #[test]
    fn only_static_legend_accepts_items() {
        let mut legend = Legend::default();
        assert!(legend.add(LegendItem::new("x", Color::BLACK)).is_err());
        let mut legend = legend.with_static(true);
        legend.add(LegendItem::new("x", Color::BLACK)).expect("static add");
        legend.collect(Vec::new());
        assert_eq!(legend.items.len(), 1);
    }

    #[test]
    fn color_bar_interpolates_gradient() {
        let bar = ColorBar::new(
            Scale::linear(0.0, 10.0).expect("scale"),
            vec![Color::BLACK, Color::WHITE],
        )
        .expect("bar");
        let mid = bar.color_at(5.0).expect("color");
        assert!((mid.red - 0.5).abs() <= 1e-12);
        assert_eq!(bar.color_at(20.0).expect("clamped"), Color::WHITE);
    }

    #[test]
    fn position_bar_reports_visible_share() {
        let bar = PositionBar::new(Scale::linear(25.0, 50.0).expect("scale"), (0.0, 100.0))
            .expect("bar");
        assert_eq!(bar.visible_fraction(), (0.25, 0.5));
    }

    #[test]
    fn empty_title_takes_no_space() {
        let measurer = HeuristicTextMeasurer::default();
        assert_eq!(Title::new("").extent(&measurer), 0.0);
        assert_eq!(Title::new("Sales").extent(&measurer), 13.0);
    }
}

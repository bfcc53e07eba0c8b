use crate::api::{
    Axis, ColorBar, Grid, Legend, LegendItem, PositionBar, Property, PropertyValue, Series, Title,
};
use crate::core::{Edge, Frame, Quad};
use crate::error::{ChartError, ChartResult};
use crate::render::{RenderFrame, TextMeasurer};
use crate::venn::VennDiagram;

/// Reserved tag addressing the data frame itself.
pub const DATA_FRAME_TAG: &str = "data_frame";

/// Concrete payload of a chart graphic.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphicKind {
    Axis(Axis),
    Title(Title),
    Legend(Legend),
    ColorBar(ColorBar),
    PositionBar(PositionBar),
    Grid(Grid),
    Series(Series),
    Venn(VennDiagram),
}

impl GraphicKind {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Axis(_) => "axis",
            Self::Title(_) => "title",
            Self::Legend(_) => "legend",
            Self::ColorBar(_) => "color-bar",
            Self::PositionBar(_) => "position-bar",
            Self::Grid(_) => "grid",
            Self::Series(_) => "series",
            Self::Venn(_) => "venn",
        }
    }
}

macro_rules! graphic_kind_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for GraphicKind {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

graphic_kind_from!(Axis, Title, Legend, ColorBar, PositionBar, Grid, Series);

impl From<VennDiagram> for GraphicKind {
    fn from(value: VennDiagram) -> Self {
        Self::Venn(value)
    }
}

/// Tagged, z-ordered element owned by a chart.
///
/// Axes, titles, legends and bars are decorations placed around the data
/// frame. Grids, series and Venn diagrams are drawn inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct Graphic {
    pub tag: String,
    /// Paint order; assigned by the chart when left unset.
    pub z_index: Option<i32>,
    pub visible: bool,
    /// Frame assigned by the last layout pass.
    pub frame: Frame,
    pub kind: GraphicKind,
}

impl Graphic {
    #[must_use]
    pub fn new(tag: impl Into<String>, kind: impl Into<GraphicKind>) -> Self {
        Self {
            tag: tag.into(),
            z_index: None,
            visible: true,
            frame: Frame::default(),
            kind: kind.into(),
        }
    }

    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = Some(z_index);
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn z(&self) -> i32 {
        self.z_index.unwrap_or(0)
    }

    /// Whether the graphic lives outside the data frame.
    #[must_use]
    pub fn is_decoration(&self) -> bool {
        matches!(
            self.kind,
            GraphicKind::Axis(_)
                | GraphicKind::Title(_)
                | GraphicKind::Legend(_)
                | GraphicKind::ColorBar(_)
                | GraphicKind::PositionBar(_)
        )
    }

    #[must_use]
    pub fn position(&self) -> Option<Edge> {
        match &self.kind {
            GraphicKind::Axis(axis) => axis.position(),
            GraphicKind::Title(title) => title.position,
            GraphicKind::Legend(legend) => legend.position,
            GraphicKind::ColorBar(bar) => bar.position,
            GraphicKind::PositionBar(bar) => bar.position,
            GraphicKind::Grid(_) | GraphicKind::Series(_) | GraphicKind::Venn(_) => None,
        }
    }

    #[must_use]
    pub fn margin(&self) -> Quad {
        match &self.kind {
            GraphicKind::Axis(axis) => axis.config.margin,
            GraphicKind::Title(title) => title.margin,
            GraphicKind::Legend(legend) => legend.margin,
            GraphicKind::ColorBar(bar) => bar.margin,
            GraphicKind::PositionBar(bar) => bar.margin,
            GraphicKind::Grid(_) | GraphicKind::Series(_) | GraphicKind::Venn(_) => Quad::ZERO,
        }
    }

    /// Space a decoration needs perpendicular to its edge.
    #[must_use]
    pub fn extent(&self, measurer: &dyn TextMeasurer) -> f64 {
        if !self.visible {
            return 0.0;
        }
        match &self.kind {
            GraphicKind::Axis(axis) => axis.get_extent(measurer),
            GraphicKind::Title(title) => title.extent(measurer),
            GraphicKind::Legend(legend) => legend.extent(measurer),
            GraphicKind::ColorBar(bar) => bar.extent(),
            GraphicKind::PositionBar(bar) => bar.extent(),
            GraphicKind::Grid(_) | GraphicKind::Series(_) | GraphicKind::Venn(_) => 0.0,
        }
    }

    #[must_use]
    pub fn legend_items(&self) -> Vec<LegendItem> {
        if !self.visible {
            return Vec::new();
        }
        match &self.kind {
            GraphicKind::Series(series) => series.legend_items(),
            GraphicKind::Venn(venn) => venn.legend_items(),
            _ => Vec::new(),
        }
    }

    pub fn draw(&self, target: &mut RenderFrame, measurer: &dyn TextMeasurer) -> ChartResult<()> {
        if !self.visible {
            return Ok(());
        }
        let frame = self.frame;
        match &self.kind {
            GraphicKind::Axis(axis) => axis.draw(frame, target, measurer)?,
            GraphicKind::Title(title) => title.draw(frame, target),
            GraphicKind::Legend(legend) => legend.draw(frame, target, measurer),
            GraphicKind::ColorBar(bar) => bar.draw(frame, target),
            GraphicKind::PositionBar(bar) => bar.draw(frame, target),
            GraphicKind::Grid(grid) => grid.draw(frame, target)?,
            GraphicKind::Series(series) => series.draw(frame, target)?,
            GraphicKind::Venn(venn) => venn.draw(frame, target)?,
        }
        Ok(())
    }

    fn mismatch(&self, property: Property) -> ChartError {
        ChartError::PropertyMismatch {
            tag: self.tag.clone(),
            property: property.to_string(),
        }
    }

    /// Current value of a mappable property.
    pub fn property(&self, property: Property) -> ChartResult<PropertyValue> {
        let value = match (&self.kind, property) {
            (GraphicKind::Axis(axis), Property::Scale) => {
                PropertyValue::Scale(axis.scale().clone())
            }
            (GraphicKind::Axis(axis), Property::Ticker) => {
                PropertyValue::Ticker(axis.ticker().clone())
            }
            (GraphicKind::Grid(grid), Property::Scale) => grid
                .scale
                .clone()
                .map(PropertyValue::Scale)
                .ok_or_else(|| self.mismatch(property))?,
            (GraphicKind::Grid(grid), Property::Ticker) => grid
                .ticker
                .clone()
                .map(PropertyValue::Ticker)
                .ok_or_else(|| self.mismatch(property))?,
            (GraphicKind::ColorBar(bar), Property::Scale) => {
                PropertyValue::Scale(bar.scale.clone())
            }
            (GraphicKind::PositionBar(bar), Property::Scale) => {
                PropertyValue::Scale(bar.scale.clone())
            }
            (GraphicKind::Series(series), Property::XScale) => {
                PropertyValue::Scale(series.x_scale.clone())
            }
            (GraphicKind::Series(series), Property::YScale) => {
                PropertyValue::Scale(series.y_scale.clone())
            }
            _ => return Err(self.mismatch(property)),
        };
        Ok(value)
    }

    /// Overwrites a mappable property; the value type must match.
    pub fn set_property(&mut self, property: Property, value: PropertyValue) -> ChartResult<()> {
        let mismatch = self.mismatch(property);
        match (&mut self.kind, property, value) {
            (GraphicKind::Axis(axis), Property::Scale, PropertyValue::Scale(scale)) => {
                axis.set_scale(scale)?;
            }
            (GraphicKind::Axis(axis), Property::Ticker, PropertyValue::Ticker(ticker)) => {
                axis.set_ticker(ticker)?;
            }
            (GraphicKind::Grid(grid), Property::Scale, PropertyValue::Scale(scale)) => {
                grid.scale = Some(scale);
            }
            (GraphicKind::Grid(grid), Property::Ticker, PropertyValue::Ticker(ticker)) => {
                grid.ticker = Some(ticker);
            }
            (GraphicKind::ColorBar(bar), Property::Scale, PropertyValue::Scale(scale)) => {
                bar.scale = scale;
            }
            (GraphicKind::PositionBar(bar), Property::Scale, PropertyValue::Scale(scale)) => {
                bar.scale = scale;
            }
            (GraphicKind::Series(series), Property::XScale, PropertyValue::Scale(scale)) => {
                series.x_scale = scale;
            }
            (GraphicKind::Series(series), Property::YScale, PropertyValue::Scale(scale)) => {
                series.y_scale = scale;
            }
            _ => return Err(mismatch),
        }
        Ok(())
    }

    #[must_use]
    pub fn as_axis(&self) -> Option<&Axis> {
        match &self.kind {
            GraphicKind::Axis(axis) => Some(axis),
            _ => None,
        }
    }

    pub fn as_axis_mut(&mut self) -> Option<&mut Axis> {
        match &mut self.kind {
            GraphicKind::Axis(axis) => Some(axis),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_series(&self) -> Option<&Series> {
        match &self.kind {
            GraphicKind::Series(series) => Some(series),
            _ => None,
        }
    }

    pub fn as_legend_mut(&mut self) -> Option<&mut Legend> {
        match &mut self.kind {
            GraphicKind::Legend(legend) => Some(legend),
            _ => None,
        }
    }
}

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::api::{
    Axis, ChartConfig, DATA_FRAME_TAG, DecorationSlot, Graphic, Layout, LayoutNegotiator,
    LegendItem, MappingRegistry, Property,
};
use crate::core::Frame;
use crate::error::{ChartError, ChartResult};
use crate::render::{CanvasLayerKind, RectPrimitive, RenderFrame, Renderer, TextMeasurer};

/// Result of a draw pass.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOutcome {
    /// Everything was painted.
    Drawn(Layout),
    /// Decorations left no room for the data frame; only the background was
    /// painted.
    NoRoom(Layout),
}

impl DrawOutcome {
    #[must_use]
    pub fn layout(&self) -> &Layout {
        match self {
            Self::Drawn(layout) | Self::NoRoom(layout) => layout,
        }
    }
}

/// Registry of tagged graphics sharing one data frame.
#[derive(Debug, Clone)]
pub struct Chart {
    config: ChartConfig,
    pub(crate) graphics: IndexMap<String, Graphic>,
    pub(crate) mappings: MappingRegistry,
    data_frame: Frame,
}

impl Chart {
    pub fn new(config: ChartConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            graphics: IndexMap::new(),
            mappings: MappingRegistry::default(),
            data_frame: config.bounds(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ChartConfig) -> ChartResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Data frame computed by the last layout pass.
    #[must_use]
    pub fn data_frame(&self) -> Frame {
        self.data_frame
    }

    /// Registers a graphic under its unique tag.
    ///
    /// A missing z-index is set just above the highest registered one, never
    /// below 2.
    pub fn add(&mut self, mut graphic: Graphic) -> ChartResult<()> {
        if graphic.tag.is_empty() {
            return Err(ChartError::InvalidConfig(
                "graphic tag must not be empty".to_owned(),
            ));
        }
        if graphic.tag == DATA_FRAME_TAG {
            return Err(ChartError::InvalidConfig(format!(
                "graphic tag `{DATA_FRAME_TAG}` is reserved"
            )));
        }
        if self.graphics.contains_key(&graphic.tag) {
            return Err(ChartError::DuplicateTag(graphic.tag));
        }
        if graphic.z_index.is_none() {
            let highest = self.graphics.values().map(Graphic::z).max().unwrap_or(0);
            graphic.z_index = Some(highest.max(1) + 1);
        }
        debug!(
            tag = %graphic.tag,
            kind = graphic.kind.name(),
            z_index = graphic.z(),
            "graphic added"
        );
        self.graphics.insert(graphic.tag.clone(), graphic);
        Ok(())
    }

    /// Unregisters a graphic together with the mappings it receives.
    pub fn remove(&mut self, tag: &str) -> ChartResult<Graphic> {
        if !self.graphics.contains_key(tag) {
            return Err(ChartError::UnknownTag(tag.to_owned()));
        }
        if let Some(dependent) = self.mappings.dependents_of(tag).first() {
            return Err(ChartError::MappingSourceInUse {
                tag: tag.to_owned(),
                dependent: (*dependent).to_owned(),
            });
        }
        self.mappings.remove_dest(tag);
        let graphic = self
            .graphics
            .shift_remove(tag)
            .ok_or_else(|| ChartError::UnknownTag(tag.to_owned()))?;
        debug!(tag, "graphic removed");
        Ok(graphic)
    }

    #[must_use]
    pub fn get_obj(&self, tag: &str) -> Option<&Graphic> {
        self.graphics.get(tag)
    }

    pub fn get_obj_mut(&mut self, tag: &str) -> Option<&mut Graphic> {
        self.graphics.get_mut(tag)
    }

    pub fn graphics(&self) -> impl Iterator<Item = &Graphic> {
        self.graphics.values()
    }

    pub fn axis(&self, tag: &str) -> ChartResult<&Axis> {
        let graphic = self
            .graphics
            .get(tag)
            .ok_or_else(|| ChartError::UnknownTag(tag.to_owned()))?;
        graphic
            .as_axis()
            .ok_or_else(|| ChartError::InvalidConfig(format!("graphic `{tag}` is not an axis")))
    }

    pub fn axis_mut(&mut self, tag: &str) -> ChartResult<&mut Axis> {
        let graphic = self
            .graphics
            .get_mut(tag)
            .ok_or_else(|| ChartError::UnknownTag(tag.to_owned()))?;
        graphic
            .as_axis_mut()
            .ok_or_else(|| ChartError::InvalidConfig(format!("graphic `{tag}` is not an axis")))
    }

    /// Tags of all axes, in registration order.
    #[must_use]
    pub fn axis_tags(&self) -> Vec<String> {
        self.graphics
            .values()
            .filter(|graphic| graphic.as_axis().is_some())
            .map(|graphic| graphic.tag.clone())
            .collect()
    }

    /// First registered axis on a top or bottom edge.
    #[must_use]
    pub fn x_axis_tag(&self) -> Option<&str> {
        self.primary_axis_tag(true)
    }

    /// First registered axis on a left or right edge.
    #[must_use]
    pub fn y_axis_tag(&self) -> Option<&str> {
        self.primary_axis_tag(false)
    }

    fn primary_axis_tag(&self, horizontal: bool) -> Option<&str> {
        self.graphics
            .values()
            .filter_map(|graphic| graphic.as_axis().map(|axis| (graphic, axis)))
            .find(|(_, axis)| {
                axis.position()
                    .is_some_and(|edge| edge.is_horizontal() == horizontal)
            })
            .map(|(graphic, _)| graphic.tag.as_str())
    }

    /// Frame of a graphic, or the data frame for [`DATA_FRAME_TAG`].
    pub fn get_frame(&self, tag: &str) -> ChartResult<Frame> {
        if tag == DATA_FRAME_TAG {
            return Ok(self.data_frame);
        }
        self.graphics
            .get(tag)
            .map(|graphic| graphic.frame)
            .ok_or_else(|| ChartError::UnknownTag(tag.to_owned()))
    }

    /// Tag of the element under a device point.
    ///
    /// The data frame wins over everything else; otherwise the visible
    /// decoration with the highest z-index is reported.
    #[must_use]
    pub fn get_obj_below(&self, x: f64, y: f64) -> Option<&str> {
        if self.data_frame.contains(x, y) {
            return Some(DATA_FRAME_TAG);
        }
        self.graphics
            .values()
            .filter(|graphic| graphic.visible && graphic.is_decoration())
            .filter(|graphic| graphic.frame.contains(x, y))
            .max_by_key(|graphic| graphic.z())
            .map(|graphic| graphic.tag.as_str())
    }

    /// Mirrors `source_property` of `source` onto `dest_property` of `dest`.
    ///
    /// The pair is checked by a trial assignment, so incompatible properties
    /// fail here rather than at draw time.
    pub fn map(
        &mut self,
        dest: &str,
        dest_property: Property,
        source: &str,
        source_property: Property,
    ) -> ChartResult<()> {
        let source_graphic = self
            .graphics
            .get(source)
            .ok_or_else(|| ChartError::UnknownTag(source.to_owned()))?;
        let dest_graphic = self
            .graphics
            .get(dest)
            .ok_or_else(|| ChartError::UnknownTag(dest.to_owned()))?;
        let value = source_graphic.property(source_property)?;
        dest_graphic.clone().set_property(dest_property, value)?;
        self.mappings
            .insert(dest, dest_property, source, source_property);
        debug!(dest, %dest_property, source, %source_property, "property mapped");
        Ok(())
    }

    pub fn unmap(&mut self, dest: &str, dest_property: Property) -> bool {
        self.mappings.remove(dest, dest_property).is_some()
    }

    /// Attaches a series to an x and a y axis through scale mappings.
    pub fn plot(&mut self, series: &str, x_axis: &str, y_axis: &str) -> ChartResult<()> {
        self.axis(x_axis)?;
        self.axis(y_axis)?;
        self.map(series, Property::XScale, x_axis, Property::Scale)?;
        self.map(series, Property::YScale, y_axis, Property::Scale)
    }

    pub(crate) fn tags_by_z(&self) -> Vec<String> {
        let mut graphics: Vec<&Graphic> = self.graphics.values().collect();
        graphics.sort_by_key(|graphic| graphic.z());
        graphics.into_iter().map(|graphic| graphic.tag.clone()).collect()
    }

    /// Pushes every mapped property from its source to its destination,
    /// destinations in ascending z order.
    pub fn apply_mappings(&mut self) -> ChartResult<()> {
        if self.mappings.is_empty() {
            return Ok(());
        }
        for dest in self.tags_by_z() {
            let links: Vec<(Property, String, Property)> = self
                .mappings
                .links_of(&dest)
                .map(|(property, source)| (property, source.tag.clone(), source.property))
                .collect();
            for (dest_property, source, source_property) in links {
                let value = self
                    .graphics
                    .get(&source)
                    .ok_or_else(|| ChartError::UnknownTag(source.clone()))?
                    .property(source_property)?;
                self.graphics
                    .get_mut(&dest)
                    .ok_or_else(|| ChartError::UnknownTag(dest.clone()))?
                    .set_property(dest_property, value)?;
                trace!(dest = %dest, %dest_property, source = %source, "mapping applied");
            }
        }
        Ok(())
    }

    /// Refills non-static legends from the visible in-frame graphics.
    fn collect_legend_items(&mut self) {
        let mut items: Vec<LegendItem> = Vec::new();
        for tag in self.tags_by_z() {
            if let Some(graphic) = self.graphics.get(&tag) {
                if !graphic.is_decoration() {
                    items.extend(graphic.legend_items());
                }
            }
        }
        for graphic in self.graphics.values_mut() {
            if let Some(legend) = graphic.as_legend_mut() {
                legend.collect(items.clone());
            }
        }
    }

    /// Computes and stores frames for the data frame and every graphic.
    pub fn layout(&mut self, measurer: &dyn TextMeasurer) -> ChartResult<Layout> {
        let mut slots = Vec::new();
        for tag in self.tags_by_z() {
            let Some(graphic) = self.graphics.get(&tag) else {
                continue;
            };
            if !graphic.is_decoration() {
                continue;
            }
            slots.push(DecorationSlot {
                tag: graphic.tag.clone(),
                position: graphic.position(),
                margin: graphic.margin(),
                visible: graphic.visible,
                extent: graphic.extent(measurer),
            });
        }

        let layout = LayoutNegotiator::new(self.config.bounds(), self.config.padding)?
            .with_overrides(self.config.frame_overrides)
            .compute(&slots)?;

        self.data_frame = layout.data_frame;
        for graphic in self.graphics.values_mut() {
            graphic.frame = if graphic.is_decoration() {
                layout.frame(&graphic.tag).unwrap_or_default()
            } else {
                layout.data_frame
            };
        }
        Ok(layout)
    }

    /// Binds axis device ranges to the current frames.
    ///
    /// Horizontal axes span the data frame width, vertical axes its height
    /// with values growing upward.
    fn bind_axis_ranges(&mut self) -> ChartResult<()> {
        let data_frame = self.data_frame;
        for graphic in self.graphics.values_mut() {
            if let Some(axis) = graphic.as_axis_mut() {
                axis.bind_range(data_frame)?;
            }
        }
        Ok(())
    }

    /// Lays out, binds and paints the chart into `renderer`.
    pub fn draw<R: Renderer>(
        &mut self,
        renderer: &mut R,
        measurer: &dyn TextMeasurer,
    ) -> ChartResult<DrawOutcome> {
        self.apply_mappings()?;
        self.collect_legend_items();
        let layout = self.layout(measurer)?;

        let mut target = RenderFrame::new(self.config.viewport);
        let bounds = self.config.bounds();
        target.push_rect(
            CanvasLayerKind::Background,
            RectPrimitive::filled(
                bounds.x,
                bounds.y,
                bounds.width,
                bounds.height,
                self.config.background.color,
            ),
        );

        if !layout.has_room() {
            debug!(
                width = layout.data_frame.width,
                height = layout.data_frame.height,
                "no room for data frame"
            );
            renderer.render(&target)?;
            return Ok(DrawOutcome::NoRoom(layout));
        }

        self.bind_axis_ranges()?;
        self.apply_mappings()?;

        target.set_clip(CanvasLayerKind::Plot, layout.data_frame);
        let order = self.tags_by_z();
        for decorations in [false, true] {
            for tag in &order {
                let Some(graphic) = self.graphics.get(tag) else {
                    continue;
                };
                if graphic.is_decoration() == decorations {
                    graphic.draw(&mut target, measurer)?;
                }
            }
        }

        target.validate()?;
        renderer.render(&target)?;
        debug!(graphics = self.graphics.len(), "chart drawn");
        Ok(DrawOutcome::Drawn(layout))
    }
}

#[cfg(test)]
mod tests {
    use super::Chart;
    use crate::api::{Axis, ChartConfig, Graphic, Title};
    use crate::core::Edge;
    use crate::error::ChartError;

    fn chart() -> Chart {
        Chart::new(ChartConfig::default()).expect("chart")
    }

    #[test]
    fn auto_z_index_starts_at_two() {
        let mut chart = chart();
        chart
            .add(Graphic::new("x", Axis::linear(Edge::Bottom).expect("axis")))
            .expect("add x");
        chart
            .add(Graphic::new("title", Title::new("Sales")).with_z_index(7))
            .expect("add title");
        chart
            .add(Graphic::new("y", Axis::linear(Edge::Left).expect("axis")))
            .expect("add y");
        assert_eq!(chart.get_obj("x").expect("x").z(), 2);
        assert_eq!(chart.get_obj("y").expect("y").z(), 8);
    }

    #[test]
    fn reserved_and_duplicate_tags_are_rejected() {
        let mut chart = chart();
        let axis = Axis::linear(Edge::Bottom).expect("axis");
        assert!(chart.add(Graphic::new("data_frame", axis.clone())).is_err());
        assert!(chart.add(Graphic::new("", axis.clone())).is_err());
        chart.add(Graphic::new("x", axis.clone())).expect("add");
        assert!(matches!(
            chart.add(Graphic::new("x", axis)),
            Err(ChartError::DuplicateTag(_))
        ));
        assert!(matches!(chart.remove("nope"), Err(ChartError::UnknownTag(_))));
    }
}

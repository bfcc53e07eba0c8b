use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::LegendItem;
use crate::core::{Frame, OrdinalScale};
use crate::error::ChartResult;
use crate::render::{
    CanvasLayerKind, Color, DEFAULT_PALETTE, LineStyle, PathPrimitive, RenderFrame, TextHAlign,
    TextPrimitive, TextStyle, TextVAlign,
};
use crate::venn::geometry::Circle;
use crate::venn::regions::{Region, make_regions};
use crate::venn::solver::{VennSolverConfig, calc_venn, fit_into};
use crate::venn::{CircleKey, RegionKey, VennMode, VennValues};

/// One placed set circle with its total value.
#[derive(Debug, Clone, PartialEq)]
pub struct VennCircle {
    pub key: CircleKey,
    pub circle: Circle,
    pub value: f64,
    pub color: Color,
    pub title: String,
}

impl VennCircle {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.circle.is_empty()
    }
}

/// One traced region with the value it stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct VennRegion {
    pub key: RegionKey,
    pub value: f64,
    pub region: Region,
}

impl VennRegion {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.region.is_empty()
    }

    #[must_use]
    pub fn label(&self) -> String {
        format!("{}", self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VennSolution {
    pub circles: [VennCircle; 3],
    pub regions: Vec<VennRegion>,
}

impl VennSolution {
    #[must_use]
    pub fn region(&self, key: RegionKey) -> Option<&VennRegion> {
        self.regions.iter().find(|region| region.key == key)
    }

    /// Sum of every region value.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.regions.iter().map(|region| region.value).sum()
    }
}

/// Venn diagram drawn inside the data frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VennDiagram {
    pub values: VennValues,
    pub mode: VennMode,
    pub solver: VennSolverConfig,
    pub titles: [String; 3],
    pub colors: [Color; 3],
    pub region_fills: IndexMap<RegionKey, Color>,
    pub show_labels: bool,
    pub show_legend: bool,
    pub label_style: TextStyle,
    pub outline: Option<LineStyle>,
    pub fill_alpha: f64,
}

impl VennDiagram {
    pub fn new(values: VennValues) -> ChartResult<Self> {
        let diagram = Self {
            values,
            mode: VennMode::default(),
            solver: VennSolverConfig::default(),
            titles: CircleKey::ALL.map(|key| key.name().to_owned()),
            colors: [Color::BLACK; 3],
            region_fills: IndexMap::new(),
            show_labels: true,
            show_legend: true,
            label_style: TextStyle::new(14.0, Color::rgb(0.2, 0.2, 0.2)),
            outline: None,
            fill_alpha: 0.6,
        };
        diagram.with_palette(&DEFAULT_PALETTE)
    }

    /// Re-assigns circle colors from `palette` in A, B, C order, wrapping
    /// around short palettes.
    pub fn with_palette(mut self, palette: &[Color]) -> ChartResult<Self> {
        let mut scale = OrdinalScale::new(palette.to_vec())
            .with_implicit(true)
            .with_recycle(true);
        for key in CircleKey::ALL {
            self.colors[key.index()] = scale.scale(&key.name().to_owned())?;
        }
        Ok(self)
    }

    #[must_use]
    pub fn with_mode(mut self, mode: VennMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_solver(mut self, solver: VennSolverConfig) -> Self {
        self.solver = solver;
        self
    }

    #[must_use]
    pub fn with_title(mut self, key: CircleKey, title: impl Into<String>) -> Self {
        self.titles[key.index()] = title.into();
        self
    }

    #[must_use]
    pub fn with_region_fill(mut self, key: RegionKey, color: Color) -> Self {
        self.region_fills.insert(key, color);
        self
    }

    #[must_use]
    pub fn with_outline(mut self, outline: LineStyle) -> Self {
        self.outline = Some(outline);
        self
    }

    #[must_use]
    pub fn with_show_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }

    /// Places circles inside `frame` and traces every region.
    pub fn solve(&self, frame: Frame) -> ChartResult<VennSolution> {
        let circles = calc_venn(&self.values, self.mode, &self.solver)?;
        let circles = fit_into(&circles, frame);
        let mut traced = make_regions(&circles);

        let regions = RegionKey::ALL
            .into_iter()
            .filter_map(|key| {
                traced.swap_remove(&key).map(|region| VennRegion {
                    key,
                    value: self.values.get(key),
                    region,
                })
            })
            .collect();

        let circles = CircleKey::ALL.map(|key| VennCircle {
            key,
            circle: circles[key.index()],
            value: self.values.circle_total(key),
            color: self.colors[key.index()],
            title: self.titles[key.index()].clone(),
        });

        Ok(VennSolution { circles, regions })
    }

    /// Legend entries for visible, non-empty, titled circles.
    #[must_use]
    pub fn legend_items(&self) -> Vec<LegendItem> {
        if !self.show_legend {
            return Vec::new();
        }
        CircleKey::ALL
            .into_iter()
            .filter(|key| self.values.circle_total(*key) > 0.0)
            .filter(|key| !self.titles[key.index()].is_empty())
            .map(|key| LegendItem::new(self.titles[key.index()].clone(), self.colors[key.index()]))
            .collect()
    }

    pub fn draw(&self, frame: Frame, target: &mut RenderFrame) -> ChartResult<()> {
        let solution = self.solve(frame)?;
        let visible_circles: Vec<&VennCircle> = solution
            .circles
            .iter()
            .filter(|circle| circle.is_visible())
            .collect();
        let visible_regions: Vec<&VennRegion> = solution
            .regions
            .iter()
            .filter(|region| region.is_visible())
            .collect();

        for circle in &visible_circles {
            let fill = circle.color.with_alpha(circle.color.alpha * self.fill_alpha);
            target.push_path(CanvasLayerKind::Plot, circle_path(circle.circle).with_fill(fill));
        }

        for region in &visible_regions {
            let Some(color) = self.region_fills.get(&region.key) else {
                continue;
            };
            if let Some(path) = region.region.path() {
                target.push_path(CanvasLayerKind::Plot, path.with_fill(*color));
            }
        }

        if let Some(outline) = self.outline {
            for circle in &visible_circles {
                target.push_path(
                    CanvasLayerKind::Plot,
                    circle_path(circle.circle).with_stroke(outline),
                );
            }
            for region in &visible_regions {
                if !self.region_fills.contains_key(&region.key) {
                    continue;
                }
                if let Some(path) = region.region.path() {
                    target.push_path(CanvasLayerKind::Plot, path.with_stroke(outline));
                }
            }
        }

        if self.show_labels {
            for region in &visible_regions {
                if region.value == 0.0 {
                    continue;
                }
                let Some((x, y)) = region.region.anchor else {
                    continue;
                };
                target.push_text(
                    CanvasLayerKind::Overlay,
                    TextPrimitive::new(
                        region.label(),
                        x,
                        y,
                        self.label_style,
                        TextHAlign::Center,
                        TextVAlign::Middle,
                    ),
                );
            }
        }

        debug!(
            circles = visible_circles.len(),
            regions = visible_regions.len(),
            "venn diagram drawn"
        );
        Ok(())
    }

    /// Region under a device point with its tooltip text.
    pub fn region_at(
        &self,
        frame: Frame,
        x: f64,
        y: f64,
    ) -> ChartResult<Option<(RegionKey, String)>> {
        let solution = self.solve(frame)?;
        let members = solution.circles.each_ref().map(|circle| circle.circle.contains(x, y));
        Ok(RegionKey::from_members(members).and_then(|key| {
            solution
                .region(key)
                .filter(|region| region.is_visible())
                .map(|region| (key, region.label()))
        }))
    }
}

fn circle_path(circle: Circle) -> PathPrimitive {
    PathPrimitive::circle(circle.cx, circle.cy, circle.r)
}

#[cfg(test)]
mod tests {
    use super::VennDiagram;
    use crate::core::{Frame, Viewport};
    use crate::render::{CanvasLayerKind, RenderFrame};
    use crate::venn::{CircleKey, RegionKey, VennMode, VennValues};

    fn sample() -> VennDiagram {
        VennDiagram::new(VennValues::new(10.0, 8.0, 22.0, 6.0, 9.0, 4.0, 2.0).expect("values"))
            .expect("diagram")
    }

    #[test]
    fn circles_get_distinct_palette_colors() {
        let diagram = sample();
        assert_ne!(diagram.colors[0], diagram.colors[1]);
        assert_ne!(diagram.colors[1], diagram.colors[2]);
    }

    #[test]
    fn legend_skips_empty_circles() {
        let diagram = VennDiagram::new(VennValues::two_sets(3.0, 4.0, 1.0).expect("values"))
            .expect("diagram")
            .with_title(CircleKey::B, "");
        let items = diagram.legend_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "A");
    }

    #[test]
    fn labels_land_in_overlay_layer() {
        let diagram = sample().with_mode(VennMode::Full);
        let mut target = RenderFrame::new(Viewport::new(400, 400));
        diagram
            .draw(Frame::new(0.0, 0.0, 400.0, 400.0), &mut target)
            .expect("draw");
        let overlay = target.layer(CanvasLayerKind::Overlay).expect("overlay");
        assert!(!overlay.texts.is_empty());
        let plot = target.layer(CanvasLayerKind::Plot).expect("plot");
        assert_eq!(plot.paths.len(), 3);
    }

    #[test]
    fn region_at_reports_tooltip_value() {
        let diagram = VennDiagram::new(VennValues::two_sets(10.0, 10.0, 5.0).expect("values"))
            .expect("diagram")
            .with_mode(VennMode::Full);
        let frame = Frame::new(0.0, 0.0, 200.0, 100.0);
        let solution = diagram.solve(frame).expect("solve");
        let a = solution.circles[0].circle;
        let probe = (a.cx - 0.9 * a.r, a.cy);
        let hit = diagram.region_at(frame, probe.0, probe.1).expect("hit test");
        assert_eq!(hit, Some((RegionKey::A, "10".to_owned())));
        assert_eq!(diagram.region_at(frame, -50.0, -50.0).expect("miss"), None);
    }
}

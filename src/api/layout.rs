use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{Edge, Frame, Quad};
use crate::error::{ChartError, ChartResult};

pub const LAYOUT_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Layout input describing one out-of-frame decoration.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationSlot {
    pub tag: String,
    pub position: Option<Edge>,
    pub margin: Quad,
    pub visible: bool,
    /// Space needed perpendicular to the edge, margins excluded.
    pub extent: f64,
}

impl DecorationSlot {
    #[must_use]
    pub fn new(tag: impl Into<String>, position: Edge, extent: f64) -> Self {
        Self {
            tag: tag.into(),
            position: Some(position),
            margin: Quad::ZERO,
            visible: true,
            extent,
        }
    }

    #[must_use]
    pub fn with_margin(mut self, margin: Quad) -> Self {
        self.margin = margin;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    fn contributes(&self) -> bool {
        self.visible && self.extent > 0.0
    }
}

/// Fixed data-frame edges that bypass the computed value for that edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameOverrides {
    pub x1: Option<f64>,
    pub x2: Option<f64>,
    pub y1: Option<f64>,
    pub y2: Option<f64>,
}

/// Computed data frame and per-decoration frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub data_frame: Frame,
    pub frames: IndexMap<String, Frame>,
}

impl Layout {
    #[must_use]
    pub fn frame(&self, tag: &str) -> Option<Frame> {
        self.frames.get(tag).copied()
    }

    #[must_use]
    pub fn has_room(&self) -> bool {
        !self.data_frame.is_reversed()
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        let payload = LayoutSnapshotJsonContractV1 {
            schema_version: LAYOUT_SNAPSHOT_JSON_SCHEMA_V1,
            layout: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize layout snapshot: {e}"))
        })
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let payload: LayoutSnapshotJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse layout snapshot json: {e}"))
        })?;
        if payload.schema_version != LAYOUT_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported layout snapshot schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.layout)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshotJsonContractV1 {
    pub schema_version: u32,
    pub layout: Layout,
}

/// Splits the chart area between perimeter decorations and the data frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutNegotiator {
    bounds: Frame,
    padding: Quad,
    overrides: FrameOverrides,
}

impl LayoutNegotiator {
    pub fn new(bounds: Frame, padding: Quad) -> ChartResult<Self> {
        if !bounds.x.is_finite()
            || !bounds.y.is_finite()
            || !bounds.width.is_finite()
            || !bounds.height.is_finite()
        {
            return Err(ChartError::InvalidConfig(
                "chart bounds must be finite".to_owned(),
            ));
        }
        padding.validate("padding")?;
        Ok(Self {
            bounds,
            padding,
            overrides: FrameOverrides::default(),
        })
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: FrameOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Computes frames for `slots`, given in paint (z) order.
    ///
    /// Slots on one edge are stacked outward from the data frame. The gap
    /// between two neighbours is the larger of their facing margins and the
    /// outermost margin of each edge is ignored. Hidden or zero-extent slots
    /// take no space and receive a zero-size frame on the data frame edge.
    pub fn compute(&self, slots: &[DecorationSlot]) -> ChartResult<Layout> {
        let mut buckets: IndexMap<Edge, Vec<&DecorationSlot>> =
            Edge::ALL.into_iter().map(|edge| (edge, Vec::new())).collect();

        for slot in slots {
            let Some(edge) = slot.position else {
                return Err(ChartError::UnknownPosition {
                    tag: slot.tag.clone(),
                    position: "none".to_owned(),
                });
            };
            if !slot.extent.is_finite() || slot.extent < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "decoration `{}` extent must be finite and >= 0",
                    slot.tag
                )));
            }
            slot.margin.validate("margin")?;
            buckets.entry(edge).or_default().push(slot);
        }

        let consumed = |edge: Edge| -> f64 {
            edge_gaps(&buckets[&edge], edge)
                .into_iter()
                .zip(buckets[&edge].iter().filter(|slot| slot.contributes()))
                .map(|(gap, slot)| gap + slot.extent)
                .sum()
        };

        let bounds = self.bounds;
        let x1 = self
            .overrides
            .x1
            .unwrap_or_else(|| bounds.x1() + self.padding.left + consumed(Edge::Left));
        let x2 = self
            .overrides
            .x2
            .unwrap_or_else(|| bounds.x2() - self.padding.right - consumed(Edge::Right));
        let y1 = self
            .overrides
            .y1
            .unwrap_or_else(|| bounds.y1() + self.padding.top + consumed(Edge::Top));
        let y2 = self
            .overrides
            .y2
            .unwrap_or_else(|| bounds.y2() - self.padding.bottom - consumed(Edge::Bottom));
        let data_frame = Frame::from_edges(x1, y1, x2, y2);

        let mut frames = IndexMap::with_capacity(slots.len());
        for edge in Edge::ALL {
            let bucket = &buckets[&edge];
            let mut gaps = edge_gaps(bucket, edge).into_iter();
            let mut shift = match edge {
                Edge::Left => data_frame.x1(),
                Edge::Right => data_frame.x2(),
                Edge::Top => data_frame.y1(),
                Edge::Bottom => data_frame.y2(),
            };

            for slot in bucket {
                let extent = if slot.contributes() {
                    let gap = gaps.next().unwrap_or(0.0);
                    shift = step_outward(shift, edge, gap);
                    slot.extent
                } else {
                    0.0
                };
                let frame = match edge {
                    Edge::Left => {
                        Frame::new(shift - extent, data_frame.y, extent, data_frame.height)
                    }
                    Edge::Right => Frame::new(shift, data_frame.y, extent, data_frame.height),
                    Edge::Top => Frame::new(data_frame.x, shift - extent, data_frame.width, extent),
                    Edge::Bottom => Frame::new(data_frame.x, shift, data_frame.width, extent),
                };
                shift = step_outward(shift, edge, extent);
                frames.insert(slot.tag.clone(), frame);
            }
        }

        debug!(
            x = data_frame.x,
            y = data_frame.y,
            width = data_frame.width,
            height = data_frame.height,
            decorations = frames.len(),
            "layout computed"
        );
        Ok(Layout { data_frame, frames })
    }
}

/// Gaps in front of each contributing slot, innermost first.
fn edge_gaps(bucket: &[&DecorationSlot], edge: Edge) -> Vec<f64> {
    let mut gaps = Vec::with_capacity(bucket.len());
    let mut previous_outer: Option<f64> = None;
    for slot in bucket.iter().filter(|slot| slot.contributes()) {
        let inner = slot.margin.inner(edge);
        gaps.push(previous_outer.map_or(inner, |outer| outer.max(inner)));
        previous_outer = Some(slot.margin.outer(edge));
    }
    gaps
}

fn step_outward(shift: f64, edge: Edge, amount: f64) -> f64 {
    match edge {
        Edge::Left | Edge::Top => shift - amount,
        Edge::Right | Edge::Bottom => shift + amount,
    }
}

//! Chart composition: axes, decorations and in-frame graphics registered by
//! tag, the layout negotiation between them, property mappings and zoom
//! propagation.

mod axis;
mod chart;
mod chart_config;
mod decorations;
mod graphics;
mod grid;
mod layout;
mod mapping;
mod series;
mod zoom;

pub use axis::{Axis, AxisConfig};
pub use chart::{Chart, DrawOutcome};
pub use chart_config::ChartConfig;
pub use decorations::{
    ColorBar, DECORATION_MARGIN, Legend, LegendItem, LegendOrientation, PositionBar, Title,
};
pub use graphics::{DATA_FRAME_TAG, Graphic, GraphicKind};
pub use grid::{Grid, GridMode, GridOrientation};
pub use layout::{
    DecorationSlot, FrameOverrides, LAYOUT_SNAPSHOT_JSON_SCHEMA_V1, Layout, LayoutNegotiator,
    LayoutSnapshotJsonContractV1,
};
pub use mapping::{MappingRegistry, MappingSource, Property, PropertyValue};
pub use series::{SERIES_MARGIN, Series, SeriesLimits};

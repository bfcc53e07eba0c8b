mod frame;
mod measure;
mod null_renderer;
mod primitives;

pub use frame::{CanvasLayerKind, RenderFrame, RenderLayer};
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, DEFAULT_PALETTE, FillStyle, LinePrimitive, LineStyle, PathCommand, PathPrimitive,
    RectPrimitive, TextHAlign, TextPrimitive, TextStyle, TextVAlign,
};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from layout and scaling logic. Layers carry
/// an optional clip rectangle the backend must honor.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

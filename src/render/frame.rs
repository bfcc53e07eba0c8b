use serde::{Deserialize, Serialize};

use crate::core::{Frame, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{LinePrimitive, PathPrimitive, RectPrimitive, TextPrimitive};

/// Canonical paint order of a chart draw pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    /// Chart background, always painted.
    Background,
    /// In-frame graphics, clipped to the data frame.
    Plot,
    /// Out-of-frame decorations: axes, legends, titles, bars.
    Decoration,
    /// Labels painted above everything else.
    Overlay,
}

impl CanvasLayerKind {
    pub const CANONICAL: [CanvasLayerKind; 4] = [
        CanvasLayerKind::Background,
        CanvasLayerKind::Plot,
        CanvasLayerKind::Decoration,
        CanvasLayerKind::Overlay,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderLayer {
    pub kind: CanvasLayerKind,
    pub clip: Option<Frame>,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
    pub paths: Vec<PathPrimitive>,
}

impl RenderLayer {
    #[must_use]
    pub fn new(kind: CanvasLayerKind) -> Self {
        Self {
            kind,
            clip: None,
            lines: Vec::new(),
            rects: Vec::new(),
            texts: Vec::new(),
            paths: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
            && self.rects.is_empty()
            && self.texts.is_empty()
            && self.paths.is_empty()
    }
}

/// Backend-agnostic scene for one chart draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub layers: Vec<RenderLayer>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layers: CanvasLayerKind::CANONICAL
                .into_iter()
                .map(RenderLayer::new)
                .collect(),
        }
    }

    #[must_use]
    pub fn layer(&self, kind: CanvasLayerKind) -> Option<&RenderLayer> {
        self.layers.iter().find(|layer| layer.kind == kind)
    }

    pub fn layer_mut(&mut self, kind: CanvasLayerKind) -> &mut RenderLayer {
        let index = match self.layers.iter().position(|layer| layer.kind == kind) {
            Some(index) => index,
            None => {
                self.layers.push(RenderLayer::new(kind));
                self.layers.len() - 1
            }
        };
        &mut self.layers[index]
    }

    pub fn set_clip(&mut self, kind: CanvasLayerKind, clip: Frame) {
        self.layer_mut(kind).clip = Some(clip);
    }

    pub fn push_line(&mut self, kind: CanvasLayerKind, line: LinePrimitive) {
        self.layer_mut(kind).lines.push(line);
    }

    pub fn push_rect(&mut self, kind: CanvasLayerKind, rect: RectPrimitive) {
        self.layer_mut(kind).rects.push(rect);
    }

    pub fn push_text(&mut self, kind: CanvasLayerKind, text: TextPrimitive) {
        self.layer_mut(kind).texts.push(text);
    }

    pub fn push_path(&mut self, kind: CanvasLayerKind, path: PathPrimitive) {
        self.layer_mut(kind).paths.push(path);
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for layer in &self.layers {
            for line in &layer.lines {
                line.validate()?;
            }
            for rect in &layer.rects {
                rect.validate()?;
            }
            for text in &layer.texts {
                text.validate()?;
            }
            for path in &layer.paths {
                path.validate()?;
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(RenderLayer::is_empty)
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.lines.len()).sum()
    }

    #[must_use]
    pub fn rect_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.rects.len()).sum()
    }

    #[must_use]
    pub fn text_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.texts.len()).sum()
    }

    #[must_use]
    pub fn path_count(&self) -> usize {
        self.layers.iter().map(|layer| layer.paths.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{CanvasLayerKind, RenderFrame};
    use crate::core::Viewport;

    #[test]
    fn new_frame_has_canonical_layer_order() {
        let frame = RenderFrame::new(Viewport::new(10, 10));
        let kinds: Vec<_> = frame.layers.iter().map(|layer| layer.kind).collect();
        assert_eq!(kinds, CanvasLayerKind::CANONICAL.to_vec());
        assert!(frame.is_empty());
    }
}

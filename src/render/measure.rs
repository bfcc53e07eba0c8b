use crate::render::TextStyle;

/// Text measurement supplied by the drawing backend.
///
/// Layout only needs bounding boxes, so decorations receive a measurer rather
/// than a full canvas.
pub trait TextMeasurer {
    /// Returns `(width, height)` of `text` rendered with `style`.
    fn measure(&self, text: &str, style: &TextStyle) -> (f64, f64);
}

/// Deterministic, backend-independent measurer based on per-glyph widths.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicTextMeasurer {
    pub line_height_factor: f64,
}

impl Default for HeuristicTextMeasurer {
    fn default() -> Self {
        Self {
            line_height_factor: 1.0,
        }
    }
}

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> (f64, f64) {
        if text.is_empty() {
            return (0.0, 0.0);
        }
        let units = text.chars().fold(0.0, |acc, ch| {
            acc + match ch {
                '0'..='9' => 0.62,
                '.' | ',' => 0.34,
                '-' | '+' | '%' => 0.42,
                ' ' => 0.33,
                _ => 0.58,
            }
        });
        let width = (units * style.font_size_px).max(style.font_size_px * 0.5);
        (width, style.font_size_px * self.line_height_factor)
    }
}

use serde::{Deserialize, Serialize};

use crate::api::FrameOverrides;
use crate::core::{Frame, Quad, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, FillStyle};

/// Placement and chrome of the whole chart inside its viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub viewport: Viewport,
    pub x: f64,
    pub y: f64,
    /// Chart width; defaults to the viewport width.
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub padding: Quad,
    pub frame_overrides: FrameOverrides,
    pub background: FillStyle,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(800, 600),
            x: 0.0,
            y: 0.0,
            width: None,
            height: None,
            padding: Quad::uniform(20.0),
            frame_overrides: FrameOverrides::default(),
            background: FillStyle::new(Color::WHITE),
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Quad) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_frame_overrides(mut self, overrides: FrameOverrides) -> Self {
        self.frame_overrides = overrides;
        self
    }

    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = FillStyle::new(color);
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::InvalidConfig(
                "chart origin must be finite".to_owned(),
            ));
        }
        for size in [self.width, self.height].into_iter().flatten() {
            if !size.is_finite() || size < 0.0 {
                return Err(ChartError::InvalidConfig(
                    "chart size must be finite and >= 0".to_owned(),
                ));
            }
        }
        let overrides = self.frame_overrides;
        if [overrides.x1, overrides.x2, overrides.y1, overrides.y2]
            .into_iter()
            .flatten()
            .any(|edge| !edge.is_finite())
        {
            return Err(ChartError::InvalidConfig(
                "frame overrides must be finite".to_owned(),
            ));
        }
        self.padding.validate("padding")
    }

    /// Outer chart frame in device pixels.
    #[must_use]
    pub fn bounds(&self) -> Frame {
        Frame::new(
            self.x,
            self.y,
            self.width.unwrap_or(f64::from(self.viewport.width)),
            self.height.unwrap_or(f64::from(self.viewport.height)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::ChartConfig;
    use crate::core::Viewport;

    #[test]
    fn bounds_default_to_viewport() {
        let config = ChartConfig::new(Viewport::new(640, 480));
        let bounds = config.bounds();
        assert_eq!((bounds.width, bounds.height), (640.0, 480.0));
        let sized = config.with_origin(10.0, 5.0).with_size(100.0, 50.0).bounds();
        assert_eq!((sized.x2(), sized.y2()), (110.0, 55.0));
    }

    #[test]
    fn zero_viewport_is_rejected() {
        assert!(ChartConfig::new(Viewport::new(0, 10)).validate().is_err());
        assert!(ChartConfig::default().with_size(f64::NAN, 1.0).validate().is_err());
    }
}

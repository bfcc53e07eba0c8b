use serde::{Deserialize, Serialize};

use crate::core::{Frame, Scale, Ticker};
use crate::error::ChartResult;
use crate::render::{CanvasLayerKind, Color, LinePrimitive, LineStyle, RenderFrame};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridMode {
    #[default]
    Major,
    Minor,
}

/// Direction the grid lines run in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridOrientation {
    /// Lines parallel to the x axis, positioned by a y scale.
    #[default]
    Horizontal,
    /// Lines parallel to the y axis, positioned by an x scale.
    Vertical,
}

/// Parallel grid lines inside the data frame.
///
/// Scale and ticker are normally mirrored from an axis through a mapping;
/// without both nothing is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub mode: GridMode,
    pub orientation: GridOrientation,
    pub scale: Option<Scale>,
    pub ticker: Option<Ticker>,
    pub line: LineStyle,
}

impl Grid {
    #[must_use]
    pub fn new(orientation: GridOrientation) -> Self {
        Self {
            mode: GridMode::Major,
            orientation,
            scale: None,
            ticker: None,
            line: LineStyle::new(1.0, Color::rgb(0.902, 0.902, 0.902)),
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: GridMode) -> Self {
        self.mode = mode;
        self
    }

    /// Device coordinates of the grid lines for the current scale.
    pub fn positions(&self) -> ChartResult<Vec<f64>> {
        let (Some(scale), Some(ticker)) = (&self.scale, &self.ticker) else {
            return Ok(Vec::new());
        };
        let mut ticker = ticker.clone();
        let (start, end) = scale.domain();
        ticker.set_domain(start, end);
        let ticks = match self.mode {
            GridMode::Major => ticker.major_ticks(),
            GridMode::Minor => ticker.minor_ticks(),
        };
        ticks.into_iter().map(|tick| scale.scale(tick)).collect()
    }

    pub fn draw(&self, frame: Frame, target: &mut RenderFrame) -> ChartResult<()> {
        for position in self.positions()? {
            let line = match self.orientation {
                GridOrientation::Horizontal => {
                    LinePrimitive::new(frame.x1(), position, frame.x2(), position, self.line)
                }
                GridOrientation::Vertical => {
                    LinePrimitive::new(position, frame.y1(), position, frame.y2(), self.line)
                }
            };
            target.push_line(CanvasLayerKind::Plot, line);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Grid, GridMode, GridOrientation};
    use crate::core::{Scale, Ticker};

    #[test]
    fn grid_without_scale_is_blank() {
        let grid = Grid::new(GridOrientation::Vertical);
        assert!(grid.positions().expect("positions").is_empty());
    }

    #[test]
    fn minor_grid_uses_minor_ticks() {
        let mut grid = Grid::new(GridOrientation::Vertical).with_mode(GridMode::Minor);
        grid.scale = Some(
            Scale::linear(0.0, 10.0)
                .expect("scale")
                .with_range(0.0, 100.0)
                .expect("range"),
        );
        grid.ticker = Some(Ticker::linear());
        let minor = grid.positions().expect("minor");
        let major = grid.clone().with_mode(GridMode::Major).positions().expect("major");
        assert!(minor.len() > major.len());
    }
}

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Builds a point whose x coordinate is the unix timestamp of `time`.
    #[must_use]
    pub fn from_time(time: DateTime<Utc>, y: f64) -> Self {
        let seconds = time.timestamp() as f64;
        let nanos = f64::from(time.timestamp_subsec_nanos()) / 1_000_000_000.0;
        Self {
            x: seconds + nanos,
            y,
        }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One of the four chart edges a decoration can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    /// Top and bottom edges run along the x dimension.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Edge::Top | Edge::Bottom)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Edge::Left => "left",
            Edge::Right => "right",
            Edge::Top => "top",
            Edge::Bottom => "bottom",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Edge {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Edge::Left),
            "right" => Ok(Edge::Right),
            "top" => Ok(Edge::Top),
            "bottom" => Ok(Edge::Bottom),
            other => Err(ChartError::UnknownPosition {
                tag: String::new(),
                position: other.to_owned(),
            }),
        }
    }
}

/// Per-side spacing in device units, ordered like CSS: top, right, bottom, left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quad {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Quad {
    pub const ZERO: Quad = Quad::new(0.0, 0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    #[must_use]
    pub const fn side(self, edge: Edge) -> f64 {
        match edge {
            Edge::Left => self.left,
            Edge::Right => self.right,
            Edge::Top => self.top,
            Edge::Bottom => self.bottom,
        }
    }

    /// Side of a decoration attached at `edge` that faces the data frame.
    #[must_use]
    pub const fn inner(self, edge: Edge) -> f64 {
        match edge {
            Edge::Left => self.right,
            Edge::Right => self.left,
            Edge::Top => self.bottom,
            Edge::Bottom => self.top,
        }
    }

    /// Side of a decoration attached at `edge` that faces away from the data frame.
    #[must_use]
    pub const fn outer(self, edge: Edge) -> f64 {
        self.side(edge)
    }

    pub fn validate(self, name: &str) -> ChartResult<()> {
        for value in [self.top, self.right, self.bottom, self.left] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "{name} values must be finite and >= 0, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Axis-aligned rectangle in device units.
///
/// Width or height may turn negative when layout runs out of space; such a
/// frame is "reversed" and callers must stop detailed drawing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[must_use]
    pub fn from_edges(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(x1, y1, x2 - x1, y2 - y1)
    }

    #[must_use]
    pub const fn x1(self) -> f64 {
        self.x
    }

    #[must_use]
    pub const fn y1(self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn x2(self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn y2(self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn cx(self) -> f64 {
        self.x + 0.5 * self.width
    }

    #[must_use]
    pub fn cy(self) -> f64 {
        self.y + 0.5 * self.height
    }

    #[must_use]
    pub fn is_reversed(self) -> bool {
        self.width < 0.0 || self.height < 0.0
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        !self.is_reversed() && x >= self.x1() && x <= self.x2() && y >= self.y1() && y <= self.y2()
    }
}

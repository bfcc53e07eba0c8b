pub mod format;
pub mod scale;
pub mod ticker;
pub mod types;
pub mod windowing;

pub use scale::{OrdinalScale, Scale, ScaleKind};
pub use ticker::{Ticker, TickerKind};
pub use types::{DataPoint, Edge, Frame, Quad, Viewport};
pub use windowing::{bounds_of, crop_points, interpolate_y, is_sorted_by_x, points_in_x_window};

//! chartframe: chart layout, scaling and Venn region engine.
//!
//! The crate splits into pure numeric models (`core`), backend-agnostic draw
//! commands (`render`), the chart object with its registries, layout and
//! zoom orchestration (`api`), cross-chart axis syncing (`interaction`) and
//! the Venn region solver (`venn`).

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;
pub mod venn;

pub use api::{Chart, ChartConfig, DrawOutcome};
pub use error::{ChartError, ChartResult};

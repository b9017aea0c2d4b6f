//! Incremental visibility scheduling
//!
//! [`VisibilityScheduler`] walks the routes and decides what to show;
//! [`VisualizationContext`] owns the pool and the active-route budget the
//! scheduler draws from.

mod context;
mod visibility;

pub use context::VisualizationContext;
pub use visibility::{PassStats, StepOutcome, Steps, VisibilityScheduler};

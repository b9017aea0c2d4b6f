//! # Route Globe
//!
//! Draws great-circle flight routes on a 3D globe without allocating a line
//! renderer per route or stalling a frame on a large route list.
//!
//! ## Features
//!
//! - **Route Pool**: reusable line renderers with an explicit free list and on-demand growth
//! - **Incremental Scheduling**: fixed-size chunks per step, resumable at any route
//! - **Backpressure**: a ceiling on concurrently shown routes, checked per route
//! - **Geodesy**: lat/lon projection and slerp-based great-circle sampling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use route_globe::prelude::*;
//!
//! fn main() -> Result<(), RouteGlobeError> {
//!     let config = VisualizerConfig::default();
//!     let source = InMemoryDataSource::new(
//!         vec![AirportRecord::new("LHR", 51.47, -0.45), AirportRecord::new("CDG", 49.01, 2.55)],
//!         vec![Route::new("LHR", "CDG")],
//!     );
//!
//!     let index = PositionIndex::from_source(&source, config.sphere_radius)?;
//!     let routes = source.routes()?;
//!     let mut ctx = VisualizationContext::from_config(
//!         &config,
//!         HeadlessRouteRenderer::new,
//!         ReferenceFrame(0),
//!     );
//!
//!     let eye = lat_lon_to_sphere(50.0, 0.0, config.sphere_radius);
//!     let mut scheduler = VisibilityScheduler::new(&config, &index, &routes, eye)?;
//!     while scheduler.step(&mut ctx) != StepOutcome::Finished {
//!         // hand control back to the host loop here
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_precision_loss)]

pub mod core;
pub mod config;
pub mod foundation;
pub mod geo;
pub mod data;
pub mod render;
pub mod pool;
pub mod scheduler;

#[cfg(test)]
mod tests;

pub use crate::core::{RouteGlobeError, Result};

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        RouteGlobeError,
        core::config::{Config, GlobeConfig, LoggingConfig, VisualizerConfig},
        data::{AirportRecord, InMemoryDataSource, PositionIndex, Route, RouteDataSource},
        foundation::math::Vec3,
        geo::{great_circle_points, lat_lon_to_sphere, GreatCircle},
        pool::{RouteHandle, RoutePool},
        render::{CoordinateSpace, HeadlessRouteRenderer, ReferenceFrame, RouteRenderer},
        scheduler::{PassStats, StepOutcome, VisibilityScheduler, VisualizationContext},
    };
}

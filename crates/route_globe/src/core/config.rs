//! # Unified Configuration System
//!
//! All tunables for a visualization run live here. They are static for the
//! duration of a pass and can be loaded from TOML or RON via [`Config`].
//!
//! ## Configuration Categories
//!
//! - **Visualizer Config**: culling, chunking, interpolation and pool sizing
//! - **Logging Config**: default log level for the binary front-ends
//! - **Globe Config**: top-level aggregate of the above

use serde::{Serialize, Deserialize};

pub use crate::config::{Config, ConfigError};

/// Radius of the stock globe scene
pub const DEFAULT_SPHERE_RADIUS: f32 = 2100.0;

/// # Visualizer Configuration
///
/// Parameters of the incremental visibility scheduler and the route pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// A route is visible when either endpoint is closer than this to the viewpoint
    pub cull_distance: f32,
    /// Number of routes processed per scheduling step
    pub chunk_size: usize,
    /// Number of segments per great-circle arc (arcs have `segments + 1` points)
    pub segments: u32,
    /// Maximum number of concurrently active route handles
    pub max_active: usize,
    /// Renderers pre-created by the pool
    pub initial_pool_size: usize,
    /// Radius of the globe all positions are projected onto
    pub sphere_radius: f32,
}

impl VisualizerConfig {
    /// Create a configuration with the stock values
    pub fn new() -> Self {
        Self {
            cull_distance: 2000.0,
            chunk_size: 10,
            segments: 32,
            max_active: 2000,
            initial_pool_size: 100,
            sphere_radius: DEFAULT_SPHERE_RADIUS,
        }
    }

    /// Set the cull distance
    pub fn with_cull_distance(mut self, distance: f32) -> Self {
        self.cull_distance = distance;
        self
    }

    /// Set the chunk size
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the arc segment count
    pub fn with_segments(mut self, segments: u32) -> Self {
        self.segments = segments;
        self
    }

    /// Set the active handle ceiling
    pub fn with_max_active(mut self, max_active: usize) -> Self {
        self.max_active = max_active;
        self
    }

    /// Set the initial pool size
    pub fn with_initial_pool_size(mut self, size: usize) -> Self {
        self.initial_pool_size = size;
        self
    }

    /// Set the sphere radius
    pub fn with_sphere_radius(mut self, radius: f32) -> Self {
        self.sphere_radius = radius;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(invalid("chunk_size", "must be at least 1"));
        }

        if self.max_active == 0 {
            return Err(invalid("max_active", "must be at least 1"));
        }

        if !self.sphere_radius.is_finite() || self.sphere_radius <= 0.0 {
            return Err(invalid(
                "sphere_radius",
                format!("must be finite and positive, got {}", self.sphere_radius),
            ));
        }

        if self.cull_distance.is_nan() || self.cull_distance < 0.0 {
            return Err(invalid(
                "cull_distance",
                format!("must be non-negative, got {}", self.cull_distance),
            ));
        }

        Ok(())
    }
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Logging Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,
}

impl LoggingConfig {
    /// Create a new logging configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Globe Configuration
///
/// Top-level configuration applications load from disk.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobeConfig {
    /// Scheduler and pool configuration
    pub visualizer: VisualizerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl GlobeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.visualizer.validate()
    }
}

impl Config for GlobeConfig {}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

//! # Core Module
//!
//! Shared configuration and the crate-wide error type that the pool and
//! scheduler build on.

pub mod config;
pub mod error;

// Re-export commonly used config types
pub use config::{
    GlobeConfig,
    VisualizerConfig,
    LoggingConfig,
    Config,
    ConfigError,
};
pub use error::{RouteGlobeError, Result};

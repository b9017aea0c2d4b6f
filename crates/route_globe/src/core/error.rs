//! Crate-wide error type

use thiserror::Error;

use crate::config::ConfigError;
use crate::geo::GeoError;
use crate::pool::PoolError;

/// Errors surfaced by the route globe crate
#[derive(Debug, Error)]
pub enum RouteGlobeError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pool misuse (releasing an unknown or free handle)
    #[error("Pool error: {0}")]
    Pool(#[from] PoolError),

    /// Geometry on degenerate input
    #[error("Geometry error: {0}")]
    Geo(#[from] GeoError),

    /// The data source failed to provide records
    #[error("Data source error: {0}")]
    DataSource(String),
}

/// Result alias using [`RouteGlobeError`]
pub type Result<T> = std::result::Result<T, RouteGlobeError>;

//! Globe geometry
//!
//! Conversions from geographic coordinates onto the globe sphere and
//! great-circle interpolation between points on it.

mod coordinates;
mod great_circle;

pub use coordinates::{lat_lon_to_sphere, sphere_to_lat_lon};
pub use great_circle::{great_circle_points, slerp_directions, GreatCircle};

use thiserror::Error;

/// Geometry errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GeoError {
    /// An input point sits at the sphere center and has no direction
    #[error("Point has zero length and no direction on the sphere")]
    ZeroVector,
}

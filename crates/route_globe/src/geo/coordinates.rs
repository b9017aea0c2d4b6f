//! Geographic coordinate conversion
//!
//! Coordinate system:
//! - Origin at the globe center
//! - +Y north (latitude drives the vertical component)
//! - +X at lat 0°, lon 0°
//! - +Z at lat 0°, lon 90°

use crate::foundation::math::{utils::{deg_to_rad, rad_to_deg}, Vec3};

/// Project a latitude/longitude in degrees onto a sphere of `radius`
pub fn lat_lon_to_sphere(latitude: f32, longitude: f32, radius: f32) -> Vec3 {
    let lat = deg_to_rad(latitude);
    let lon = deg_to_rad(longitude);

    let (sin_lat, cos_lat) = lat.sin_cos();
    let (sin_lon, cos_lon) = lon.sin_cos();

    Vec3::new(
        radius * cos_lat * cos_lon,
        radius * sin_lat,
        radius * cos_lat * sin_lon,
    )
}

/// Inverse of [`lat_lon_to_sphere`], returning `(latitude, longitude)` in degrees
///
/// The zero vector maps to `(0, 0)`.
pub fn sphere_to_lat_lon(point: &Vec3) -> (f32, f32) {
    let length = point.norm();
    if length <= f32::EPSILON {
        return (0.0, 0.0);
    }

    let latitude = rad_to_deg((point.y / length).clamp(-1.0, 1.0).asin());
    let longitude = rad_to_deg(point.z.atan2(point.x));
    (latitude, longitude)
}

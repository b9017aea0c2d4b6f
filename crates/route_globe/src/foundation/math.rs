//! Math utilities and types
//!
//! Provides the vector types and helpers shared by the geodesy, culling and
//! interpolation code.

pub use nalgebra::Vector3;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Any unit vector perpendicular to `v`
    ///
    /// Uses world up unless `v` is (nearly) parallel to it, then world X.
    /// `v` must be non-zero.
    pub fn any_perpendicular(v: &Vec3) -> Vec3 {
        let n = v.normalize();
        let reference = if n.y.abs() > 0.9 { Vec3::x() } else { Vec3::y() };
        reference.cross(&n).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_degree_radian_round_trip() {
        assert_relative_eq!(utils::deg_to_rad(180.0), constants::PI, epsilon = 1e-6);
        assert_relative_eq!(utils::rad_to_deg(constants::PI * 0.5), 90.0, epsilon = 1e-4);
    }

    #[test]
    fn test_any_perpendicular_is_orthogonal() {
        for v in [Vec3::x(), Vec3::y(), -Vec3::y(), Vec3::new(1.0, 2.0, 3.0)] {
            let p = utils::any_perpendicular(&v);
            assert_relative_eq!(p.dot(&v), 0.0, epsilon = 1e-5);
            assert_relative_eq!(p.norm(), 1.0, epsilon = 1e-5);
        }
    }
}

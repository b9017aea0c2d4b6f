//! Great-circle interpolation
//!
//! Arcs are produced by spherical linear interpolation of the normalized
//! endpoint directions, then scaled back onto the sphere, so every sample lies
//! on the surface instead of the straight chord between the endpoints.
//!
//! Exactly (or numerically) antipodal endpoints do not define a unique arc
//! plane. Those arcs are drawn through a fixed perpendicular axis picked by
//! [`any_perpendicular`] and reported through [`GreatCircle::degenerate`].

use super::GeoError;
use crate::foundation::math::{constants::PI, utils::any_perpendicular, Vec3};

/// Above this cosine the directions are close enough for normalized lerp
const PARALLEL_COSINE: f32 = 0.9995;

/// `1 + cos(angle)` below this counts as antipodal
const ANTIPODAL_EPSILON: f32 = 1e-6;

/// Sampled great-circle arc
#[derive(Debug, Clone, PartialEq)]
pub struct GreatCircle {
    /// `segments + 1` points from start to end, each at the sphere radius
    pub points: Vec<Vec3>,
    /// The endpoints were antipodal and the arc plane was chosen arbitrarily
    pub degenerate: bool,
}

impl GreatCircle {
    /// Number of sampled points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the arc has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Sample the great circle between `start` and `end`
///
/// Produces `segments + 1` points at `t = k / segments` for `k = 0..=segments`,
/// each scaled to `radius`. Zero segments yields the start point alone.
pub fn great_circle_points(
    start: &Vec3,
    end: &Vec3,
    segments: u32,
    radius: f32,
) -> Result<GreatCircle, GeoError> {
    let from = direction(start)?;
    let to = direction(end)?;
    let degenerate = is_antipodal(&from, &to);

    if segments == 0 {
        return Ok(GreatCircle {
            points: vec![from * radius],
            degenerate,
        });
    }

    let step = 1.0 / segments as f32;
    let mut points = Vec::with_capacity(segments as usize + 1);
    for k in 0..=segments {
        let t = k as f32 * step;
        points.push(interpolate(&from, &to, t) * radius);
    }

    // Pin the far end so the fallback plane still lands on `end`
    if let Some(last) = points.last_mut() {
        *last = to * radius;
    }

    Ok(GreatCircle { points, degenerate })
}

/// Spherically interpolate between two directions, returning a unit vector
pub fn slerp_directions(from: &Vec3, to: &Vec3, t: f32) -> Result<Vec3, GeoError> {
    let from = direction(from)?;
    let to = direction(to)?;
    Ok(interpolate(&from, &to, t))
}

fn direction(v: &Vec3) -> Result<Vec3, GeoError> {
    v.try_normalize(f32::EPSILON).ok_or(GeoError::ZeroVector)
}

fn is_antipodal(from: &Vec3, to: &Vec3) -> bool {
    1.0 + from.dot(to) < ANTIPODAL_EPSILON
}

/// Both inputs must already be unit length
fn interpolate(from: &Vec3, to: &Vec3, t: f32) -> Vec3 {
    let cos_omega = from.dot(to).clamp(-1.0, 1.0);

    if cos_omega > PARALLEL_COSINE {
        let v = from + (to - from) * t;
        return v.try_normalize(f32::EPSILON).unwrap_or(*from);
    }

    if 1.0 + cos_omega < ANTIPODAL_EPSILON {
        let axis = any_perpendicular(from);
        let (sin_a, cos_a) = (PI * t).sin_cos();
        return from * cos_a + axis * sin_a;
    }

    let omega = cos_omega.acos();
    let sin_omega = omega.sin();
    let s0 = ((1.0 - t) * omega).sin() / sin_omega;
    let s1 = (t * omega).sin() / sin_omega;
    (from * s0 + to * s1).normalize()
}

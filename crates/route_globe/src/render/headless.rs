//! Display-less route renderer

use super::{CoordinateSpace, ReferenceFrame, RouteRenderer};
use crate::foundation::math::Vec3;

/// Renderer that only records the state it was put into
#[derive(Debug, Clone, Default)]
pub struct HeadlessRouteRenderer {
    points: Vec<Vec3>,
    space: CoordinateSpace,
    parent: Option<ReferenceFrame>,
    active: bool,
    uploads: u64,
}

impl HeadlessRouteRenderer {
    /// Create an inactive renderer with no points
    pub fn new() -> Self {
        Self::default()
    }

    /// Current polyline
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Current coordinate space
    pub fn coordinate_space(&self) -> CoordinateSpace {
        self.space
    }

    /// Parent frame, if attached
    pub fn parent(&self) -> Option<ReferenceFrame> {
        self.parent
    }

    /// Number of `set_points` calls received
    pub fn uploads(&self) -> u64 {
        self.uploads
    }
}

impl RouteRenderer for HeadlessRouteRenderer {
    fn set_points(&mut self, points: &[Vec3]) {
        self.points.clear();
        self.points.extend_from_slice(points);
        self.uploads += 1;
    }

    fn set_coordinate_space(&mut self, space: CoordinateSpace) {
        self.space = space;
    }

    fn set_parent(&mut self, frame: ReferenceFrame) {
        self.parent = Some(frame);
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_points_replaces_contents() {
        let mut renderer = HeadlessRouteRenderer::new();
        renderer.set_points(&[Vec3::x(), Vec3::y(), Vec3::z()]);
        renderer.set_points(&[Vec3::z()]);

        assert_eq!(renderer.points(), &[Vec3::z()]);
        assert_eq!(renderer.uploads(), 2);

        renderer.clear_points();
        assert!(renderer.points().is_empty());
    }

    #[test]
    fn test_parenting_and_activation() {
        let mut renderer = HeadlessRouteRenderer::new();
        assert!(!renderer.is_active());
        assert_eq!(renderer.coordinate_space(), CoordinateSpace::World);
        assert_eq!(renderer.parent(), None);

        renderer.set_coordinate_space(CoordinateSpace::Local);
        renderer.set_parent(ReferenceFrame(7));
        renderer.set_active(true);

        assert!(renderer.is_active());
        assert_eq!(renderer.coordinate_space(), CoordinateSpace::Local);
        assert_eq!(renderer.parent(), Some(ReferenceFrame(7)));
    }
}

//! # Route Rendering Abstraction
//!
//! The scheduler never draws anything itself. Each pooled handle wraps a
//! renderer implementing [`RouteRenderer`], the line primitive of whatever
//! host displays the globe.
//!
//! ## Contract
//!
//! - **Points**: an ordered polyline, replacing any previous contents
//! - **Space**: world space, or local space relative to a parent frame
//! - **Activation**: visible or hidden
//!
//! [`HeadlessRouteRenderer`] implements the contract without a display and
//! records what it was given, for tests and headless runs.

mod headless;

pub use headless::HeadlessRouteRenderer;

use crate::foundation::math::Vec3;

/// Opaque id of the reference frame route lines are parented to
///
/// On a spinning globe this is the planet's transform, so routes rotate with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ReferenceFrame(pub u64);

/// How a renderer interprets the points it is given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateSpace {
    /// Points are absolute world positions
    #[default]
    World,
    /// Points are relative to the parent [`ReferenceFrame`]
    Local,
}

/// Line primitive that displays one route
pub trait RouteRenderer {
    /// Replace the displayed polyline
    fn set_points(&mut self, points: &[Vec3]);

    /// Drop all points
    fn clear_points(&mut self) {
        self.set_points(&[]);
    }

    /// Choose how points are interpreted
    fn set_coordinate_space(&mut self, space: CoordinateSpace);

    /// Attach to a parent frame without changing the local points
    fn set_parent(&mut self, frame: ReferenceFrame);

    /// Show or hide the line
    fn set_active(&mut self, active: bool);

    /// Whether the line is currently shown
    fn is_active(&self) -> bool;
}

//! Visualization context
//!
//! Owns the route pool and the set of active handles for one visualization
//! pass. The active count is the backpressure signal the scheduler checks
//! before each candidate route.

use std::collections::VecDeque;

use slotmap::SecondaryMap;

use crate::core::VisualizerConfig;
use crate::foundation::math::Vec3;
use crate::pool::{PoolError, RouteHandle, RoutePool};
use crate::render::{CoordinateSpace, ReferenceFrame, RouteRenderer};

/// Stale order entries tolerated beyond the live count before compacting
const ORDER_SLACK: usize = 32;

/// Pool plus active-handle bookkeeping for a visualization pass
///
/// Handles become active through [`Self::activate`] and go back to the pool
/// only through [`Self::release`], [`Self::release_oldest`] or
/// [`Self::release_all`]. The active count therefore always equals the
/// number of shown routes.
///
/// Releasing any handle is O(1) amortized: `order` keeps activation order
/// and entries whose sequence number no longer matches `active` are dropped
/// lazily.
pub struct VisualizationContext<R> {
    pool: RoutePool<R>,
    /// Activation sequence number of each active handle
    active: SecondaryMap<RouteHandle, u64>,
    /// Handles in activation order, possibly including released ones
    order: VecDeque<(RouteHandle, u64)>,
    next_sequence: u64,
    max_active: usize,
    frame: ReferenceFrame,
}

impl<R: RouteRenderer> VisualizationContext<R> {
    /// Create a context around an existing pool
    pub fn new(pool: RoutePool<R>, max_active: usize, frame: ReferenceFrame) -> Self {
        Self {
            pool,
            active: SecondaryMap::new(),
            order: VecDeque::new(),
            next_sequence: 0,
            max_active,
            frame,
        }
    }

    /// Create a context and its pool from configuration
    pub fn from_config(
        config: &VisualizerConfig,
        factory: impl FnMut() -> R + 'static,
        frame: ReferenceFrame,
    ) -> Self {
        let pool = RoutePool::new(config.initial_pool_size, factory);
        Self::new(pool, config.max_active, frame)
    }

    /// Show a polyline on a pooled renderer parented to the context's frame
    pub fn activate(&mut self, points: &[Vec3]) -> RouteHandle {
        let handle = self.pool.acquire();

        if let Some(renderer) = self.pool.get_mut(handle) {
            renderer.set_coordinate_space(CoordinateSpace::Local);
            renderer.set_parent(self.frame);
            renderer.set_points(points);
            renderer.set_active(true);
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.active.insert(handle, sequence);
        self.order.push_back((handle, sequence));
        handle
    }

    /// Hide a route and return its renderer to the pool
    pub fn release(&mut self, handle: RouteHandle) -> Result<(), PoolError> {
        self.pool.release(handle)?;

        if let Some(renderer) = self.pool.get_mut(handle) {
            renderer.set_active(false);
            renderer.clear_points();
        }

        self.active.remove(handle);
        self.compact_order();

        log::trace!("Released route handle {:?}, {} active", handle, self.active.len());
        Ok(())
    }

    /// Release the longest-active route, if any
    pub fn release_oldest(&mut self) -> Option<RouteHandle> {
        self.compact_order();
        let (handle, _) = *self.order.front()?;
        self.release(handle).ok()?;
        Some(handle)
    }

    /// Release every active route, returning how many were released
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        while self.release_oldest().is_some() {
            released += 1;
        }

        if released > 0 {
            log::debug!("Released all {} active routes", released);
        }
        released
    }
}

impl<R> VisualizationContext<R> {
    /// Number of currently active routes
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Active route ceiling
    pub fn max_active(&self) -> usize {
        self.max_active
    }

    /// Whether the backpressure gate is closed
    pub fn is_saturated(&self) -> bool {
        self.active.len() >= self.max_active
    }

    /// Active handles, oldest first
    pub fn active_handles(&self) -> impl Iterator<Item = RouteHandle> + '_ {
        let active = &self.active;
        self.order
            .iter()
            .filter(move |(handle, sequence)| active.get(*handle) == Some(sequence))
            .map(|&(handle, _)| handle)
    }

    /// Frame new routes are parented to
    pub fn frame(&self) -> ReferenceFrame {
        self.frame
    }

    /// The underlying pool
    pub fn pool(&self) -> &RoutePool<R> {
        &self.pool
    }

    fn is_live(&self, entry: (RouteHandle, u64)) -> bool {
        self.active.get(entry.0) == Some(&entry.1)
    }

    /// Drop released entries from the front, and everywhere once they pile up
    fn compact_order(&mut self) {
        while let Some(&entry) = self.order.front() {
            if self.is_live(entry) {
                break;
            }
            self.order.pop_front();
        }

        if self.order.len() > 2 * self.active.len() + ORDER_SLACK {
            let active = &self.active;
            self.order.retain(|(handle, sequence)| active.get(*handle) == Some(sequence));
        }
    }
}

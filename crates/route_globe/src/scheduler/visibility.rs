//! Incremental visibility scheduling
//!
//! Walks the route list in fixed-size chunks. Each call to
//! [`VisibilityScheduler::step`] does at most one chunk of work and returns,
//! which is where the host gets control back (one call per frame, a task
//! queue, a test loop...).
//!
//! ```text
//!            ┌──────────── step() ────────────┐
//!            │  gate closed?  ──yes──► Blocked │
//!   cursor ──┤       │no                       │
//!            │  visit route, cursor += 1       │
//!            │  chunk done?   ──yes──► Chunk   │
//!            └─────────────────────────────────┘
//!   cursor >= N ───────────────────────► Finished
//! ```
//!
//! The backpressure gate is checked before every candidate, so a chunk can be
//! interrupted and resumed across several `Blocked` steps. It still counts as
//! one chunk: a pass over `N` routes always reports `ceil(N / chunk_size)`
//! chunks.

use super::VisualizationContext;
use crate::config::ConfigError;
use crate::core::VisualizerConfig;
use crate::data::{PositionIndex, Route};
use crate::foundation::math::Vec3;
use crate::geo::great_circle_points;
use crate::render::RouteRenderer;

/// Result of one scheduling step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Finished routes `[start, end)`, the `index`-th chunk of the pass
    Chunk {
        /// Zero-based chunk number
        index: usize,
        /// First route of the chunk
        start: usize,
        /// One past the last route of the chunk
        end: usize,
    },
    /// The active ceiling is reached; the route at `cursor` is still pending
    Blocked {
        /// Route waiting for the gate to open
        cursor: usize,
    },
    /// Every route has been visited
    Finished,
}

/// Diagnostics collected over a pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Completed chunks
    pub chunks: usize,
    /// Routes visited
    pub visited: usize,
    /// Routes that passed the distance cull and were activated
    pub visible: usize,
    /// Routes with both endpoints farther than the cull distance
    pub culled: usize,
    /// Routes referencing an airport missing from the index
    pub missing_endpoint: usize,
    /// Visible routes between antipodal airports
    pub degenerate_arcs: usize,
    /// Routes whose endpoints could not be interpolated
    pub rejected_geometry: usize,
    /// Steps that returned [`StepOutcome::Blocked`]
    pub blocked_steps: usize,
}

#[derive(Debug, Clone, Copy)]
struct ChunkBounds {
    index: usize,
    start: usize,
    end: usize,
}

/// Chunked, budget-limited visibility pass over a route list
#[derive(Debug)]
pub struct VisibilityScheduler<'a> {
    index: &'a PositionIndex,
    routes: &'a [Route],
    viewpoint: Vec3,
    cull_distance: f32,
    chunk_size: usize,
    segments: u32,
    radius: f32,
    cursor: usize,
    chunk: Option<ChunkBounds>,
    stats: PassStats,
    reported: bool,
}

impl<'a> VisibilityScheduler<'a> {
    /// Prepare a pass over `routes`, culling against `viewpoint`
    pub fn new(
        config: &VisualizerConfig,
        index: &'a PositionIndex,
        routes: &'a [Route],
        viewpoint: Vec3,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        if (index.radius() - config.sphere_radius).abs() > f32::EPSILON * config.sphere_radius {
            log::warn!(
                "PositionIndex radius {} differs from configured sphere radius {}",
                index.radius(), config.sphere_radius
            );
        }

        log::debug!(
            "Scheduling {} routes in chunks of {} against {} airports",
            routes.len(), config.chunk_size, index.len()
        );

        Ok(Self {
            index,
            routes,
            viewpoint,
            cull_distance: config.cull_distance,
            chunk_size: config.chunk_size,
            segments: config.segments,
            radius: config.sphere_radius,
            cursor: 0,
            chunk: None,
            stats: PassStats::default(),
            reported: false,
        })
    }

    /// Do one unit of work
    ///
    /// Processes the rest of the current chunk unless the backpressure gate
    /// closes first. Once every route is visited this keeps returning
    /// [`StepOutcome::Finished`].
    pub fn step<R: RouteRenderer>(&mut self, ctx: &mut VisualizationContext<R>) -> StepOutcome {
        let total = self.routes.len();
        if self.cursor >= total {
            self.report();
            return StepOutcome::Finished;
        }

        let (index, cursor, chunk_size) = (self.stats.chunks, self.cursor, self.chunk_size);
        let chunk = *self.chunk.get_or_insert_with(|| ChunkBounds {
            index,
            start: cursor,
            end: cursor.saturating_add(chunk_size).min(total),
        });

        while self.cursor < chunk.end {
            if ctx.is_saturated() {
                self.stats.blocked_steps += 1;
                return StepOutcome::Blocked { cursor: self.cursor };
            }

            self.visit(self.cursor, ctx);
            self.cursor += 1;
        }

        self.chunk = None;
        self.stats.chunks += 1;
        StepOutcome::Chunk {
            index: chunk.index,
            start: chunk.start,
            end: chunk.end,
        }
    }

    /// Iterate over step outcomes until the pass finishes
    ///
    /// The iterator borrows the context; use [`Steps::context_mut`] between
    /// items to release routes while blocked.
    pub fn steps<'s, R: RouteRenderer>(
        &'s mut self,
        ctx: &'s mut VisualizationContext<R>,
    ) -> Steps<'s, 'a, R> {
        Steps {
            scheduler: self,
            ctx,
            done: false,
        }
    }

    /// Run the pass to completion
    ///
    /// `on_tick` runs after every step that did not finish the pass and
    /// stands in for the host's frame. Nothing inside the scheduler releases
    /// routes, so while blocked `on_tick` must release some or this never
    /// returns.
    pub fn drive<R, F>(&mut self, ctx: &mut VisualizationContext<R>, mut on_tick: F) -> PassStats
    where
        R: RouteRenderer,
        F: FnMut(&mut VisualizationContext<R>, &StepOutcome),
    {
        loop {
            let outcome = self.step(ctx);
            if outcome == StepOutcome::Finished {
                return self.stats.clone();
            }
            on_tick(ctx, &outcome);
        }
    }

    /// Whether every route has been visited
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.routes.len()
    }

    /// Routes visited so far and the total
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor, self.routes.len())
    }

    /// Diagnostics so far
    pub fn stats(&self) -> &PassStats {
        &self.stats
    }

    fn visit<R: RouteRenderer>(&mut self, position: usize, ctx: &mut VisualizationContext<R>) {
        let routes = self.routes;
        let route = &routes[position];
        self.stats.visited += 1;

        let Some((start, end)) = self
            .index
            .endpoints(&route.source_airport_id, &route.destination_airport_id)
        else {
            self.stats.missing_endpoint += 1;
            log::debug!(
                "Skipping route {} ({} -> {}): unknown airport",
                position, route.source_airport_id, route.destination_airport_id
            );
            return;
        };

        if !self.is_visible(&start, &end) {
            self.stats.culled += 1;
            return;
        }

        let arc = match great_circle_points(&start, &end, self.segments, self.radius) {
            Ok(arc) => arc,
            Err(err) => {
                self.stats.rejected_geometry += 1;
                log::warn!("Skipping route {}: {}", position, err);
                return;
            }
        };

        if arc.degenerate {
            self.stats.degenerate_arcs += 1;
            log::warn!(
                "Route {} ({} -> {}) joins antipodal airports, drawing it in a fallback plane",
                position, route.source_airport_id, route.destination_airport_id
            );
        }

        ctx.activate(&arc.points);
        self.stats.visible += 1;
    }

    fn is_visible(&self, start: &Vec3, end: &Vec3) -> bool {
        (self.viewpoint - start).norm() < self.cull_distance
            || (self.viewpoint - end).norm() < self.cull_distance
    }

    fn report(&mut self) {
        if self.reported {
            return;
        }
        self.reported = true;

        let s = &self.stats;
        log::info!(
            "Visualization pass finished: {} routes in {} chunks, {} visible, {} culled, {} missing endpoint, {} degenerate, {} blocked steps",
            s.visited, s.chunks, s.visible, s.culled, s.missing_endpoint, s.degenerate_arcs, s.blocked_steps
        );
    }
}

/// Iterator over the steps of a pass, see [`VisibilityScheduler::steps`]
pub struct Steps<'s, 'a, R> {
    scheduler: &'s mut VisibilityScheduler<'a>,
    ctx: &'s mut VisualizationContext<R>,
    done: bool,
}

impl<'s, 'a, R: RouteRenderer> Steps<'s, 'a, R> {
    /// The context the pass activates routes in
    pub fn context_mut(&mut self) -> &mut VisualizationContext<R> {
        &mut *self.ctx
    }

    /// Diagnostics so far
    pub fn stats(&self) -> &PassStats {
        self.scheduler.stats()
    }
}

impl<'s, 'a, R: RouteRenderer> Iterator for Steps<'s, 'a, R> {
    type Item = StepOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let outcome = self.scheduler.step(self.ctx);
        if outcome == StepOutcome::Finished {
            self.done = true;
        }
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::AirportRecord;
    use crate::pool::RoutePool;
    use crate::render::{HeadlessRouteRenderer, ReferenceFrame};

    const R: f32 = 2100.0;

    fn index() -> PositionIndex {
        PositionIndex::from_airports(
            &[
                AirportRecord::new("A", 0.0, 0.0),
                AirportRecord::new("B", 0.0, 10.0),
                AirportRecord::new("C", 0.0, 20.0),
                AirportRecord::new("FAR", 0.0, 180.0),
                AirportRecord::new("FAR2", 10.0, 170.0),
            ],
            R,
        )
    }

    fn context(max_active: usize) -> VisualizationContext<HeadlessRouteRenderer> {
        VisualizationContext::new(RoutePool::new(4, HeadlessRouteRenderer::new), max_active, ReferenceFrame(1))
    }

    fn config(chunk_size: usize) -> VisualizerConfig {
        VisualizerConfig::new().with_chunk_size(chunk_size).with_segments(4)
    }

    fn viewpoint() -> Vec3 {
        Vec3::new(R, 0.0, 0.0)
    }

    #[test]
    fn test_chunk_count_is_ceiling() {
        let index = index();
        for (n, chunk) in [(0, 3), (1, 3), (3, 3), (7, 3), (10, 1), (5, 10)] {
            let routes = vec![Route::new("A", "B"); n];
            let mut ctx = context(usize::MAX);
            let mut scheduler = VisibilityScheduler::new(&config(chunk), &index, &routes, viewpoint()).unwrap();

            let chunks = scheduler
                .steps(&mut ctx)
                .filter(|o| matches!(o, StepOutcome::Chunk { .. }))
                .count();
            assert_eq!(chunks, n.div_ceil(chunk), "n = {n}, chunk = {chunk}");
        }
    }

    #[test]
    fn test_chunk_bounds_cover_routes() {
        let index = index();
        let routes = vec![Route::new("A", "B"); 5];
        let mut ctx = context(usize::MAX);
        let mut scheduler = VisibilityScheduler::new(&config(2), &index, &routes, viewpoint()).unwrap();

        assert_eq!(scheduler.step(&mut ctx), StepOutcome::Chunk { index: 0, start: 0, end: 2 });
        assert_eq!(scheduler.step(&mut ctx), StepOutcome::Chunk { index: 1, start: 2, end: 4 });
        assert_eq!(scheduler.step(&mut ctx), StepOutcome::Chunk { index: 2, start: 4, end: 5 });
        assert_eq!(scheduler.step(&mut ctx), StepOutcome::Finished);
        assert_eq!(scheduler.step(&mut ctx), StepOutcome::Finished);
        assert!(scheduler.is_finished());
    }

    #[test]
    fn test_missing_endpoint_is_skipped() {
        let index = index();
        let routes = vec![Route::new("A", "NOPE"), Route::new("NOPE", "A")];
        let mut ctx = context(usize::MAX);
        let mut scheduler = VisibilityScheduler::new(&config(10), &index, &routes, viewpoint()).unwrap();

        let stats = scheduler.drive(&mut ctx, |_, _| {});
        assert_eq!(stats.missing_endpoint, 2);
        assert_eq!(stats.visible, 0);
        assert_eq!(ctx.active_count(), 0);
        assert_eq!(ctx.pool().stats().acquisitions, 0);
    }

    #[test]
    fn test_distance_cull() {
        let index = index();
        // FAR -> FAR2 is on the opposite side of the globe from the viewpoint
        let routes = vec![Route::new("FAR", "FAR2"), Route::new("FAR", "A"), Route::new("B", "FAR")];
        let mut ctx = context(usize::MAX);
        let mut scheduler = VisibilityScheduler::new(&config(10), &index, &routes, viewpoint()).unwrap();

        let stats = scheduler.drive(&mut ctx, |_, _| {});
        assert_eq!(stats.culled, 1);
        assert_eq!(stats.visible, 2);
        assert_eq!(ctx.active_count(), 2);
    }

    #[test]
    fn test_cull_threshold_is_strict() {
        let index = index();
        let routes = vec![Route::new("A", "A")];
        let mut ctx = context(usize::MAX);
        // Viewpoint exactly cull_distance away from A
        let eye = Vec3::new(R + 100.0, 0.0, 0.0);
        let config = config(1).with_cull_distance(100.0);
        let mut scheduler = VisibilityScheduler::new(&config, &index, &routes, eye).unwrap();

        let stats = scheduler.drive(&mut ctx, |_, _| {});
        assert_eq!(stats.culled, 1);
    }

    #[test]
    fn test_visible_route_gets_full_arc() {
        let index = index();
        let routes = vec![Route::new("A", "C")];
        let mut ctx = context(usize::MAX);
        let mut scheduler = VisibilityScheduler::new(&config(1), &index, &routes, viewpoint()).unwrap();
        scheduler.drive(&mut ctx, |_, _| {});

        let handle = ctx.active_handles().next().expect("one active route");
        let renderer = ctx.pool().get(handle).expect("pooled");
        assert_eq!(renderer.points().len(), 5);
        assert!(renderer.is_active());
        assert_eq!(renderer.parent(), Some(ReferenceFrame(1)));
    }

    #[test]
    fn test_backpressure_blocks_until_release() {
        let index = index();
        let routes = vec![Route::new("A", "B"); 3];
        let mut ctx = context(1);
        let mut scheduler = VisibilityScheduler::new(&config(10), &index, &routes, viewpoint()).unwrap();

        assert_eq!(scheduler.step(&mut ctx), StepOutcome::Blocked { cursor: 1 });
        assert_eq!(ctx.active_count(), 1);

        // Still blocked without a release; nothing new is acquired
        assert_eq!(scheduler.step(&mut ctx), StepOutcome::Blocked { cursor: 1 });
        assert_eq!(ctx.pool().stats().acquisitions, 1);

        ctx.release_oldest().expect("one active");
        assert_eq!(scheduler.step(&mut ctx), StepOutcome::Blocked { cursor: 2 });

        ctx.release_oldest().expect("one active");
        assert_eq!(scheduler.step(&mut ctx), StepOutcome::Chunk { index: 0, start: 0, end: 3 });
        assert_eq!(scheduler.stats().blocked_steps, 3);
        assert_eq!(scheduler.stats().chunks, 1);
    }

    #[test]
    fn test_gate_applies_to_skipped_candidates_too() {
        let index = index();
        let routes = vec![Route::new("A", "B"), Route::new("A", "NOPE")];
        let mut ctx = context(1);
        let mut scheduler = VisibilityScheduler::new(&config(10), &index, &routes, viewpoint()).unwrap();

        assert_eq!(scheduler.step(&mut ctx), StepOutcome::Blocked { cursor: 1 });
        assert_eq!(scheduler.stats().missing_endpoint, 0);
    }

    #[test]
    fn test_drive_with_releasing_tick() {
        let index = index();
        let routes = vec![Route::new("A", "B"); 25];
        let mut ctx = context(4);
        let mut scheduler = VisibilityScheduler::new(&config(3), &index, &routes, viewpoint()).unwrap();

        let stats = scheduler.drive(&mut ctx, |ctx, outcome| {
            if matches!(outcome, StepOutcome::Blocked { .. }) {
                ctx.release_oldest();
            }
        });

        assert_eq!(stats.visible, 25);
        assert_eq!(stats.chunks, 9);
        assert!(ctx.active_count() <= 4);
        assert!(ctx.pool().len() <= 5);
    }

    #[test]
    fn test_antipodal_route_is_flagged() {
        let index = index();
        let routes = vec![Route::new("A", "FAR")];
        let mut ctx = context(usize::MAX);
        let mut scheduler = VisibilityScheduler::new(&config(1), &index, &routes, viewpoint()).unwrap();

        let stats = scheduler.drive(&mut ctx, |_, _| {});
        assert_eq!(stats.degenerate_arcs, 1);
        assert_eq!(stats.visible, 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let index = index();
        let routes: Vec<Route> = Vec::new();
        let result = VisibilityScheduler::new(&config(0), &index, &routes, viewpoint());
        assert!(matches!(result, Err(ConfigError::Invalid { field: "chunk_size", .. })));
    }

    #[test]
    fn test_unbounded_chunk_resumes_after_block() {
        let index = index();
        let routes = vec![Route::new("A", "B"); 5];
        let mut ctx = context(1);
        let mut scheduler = VisibilityScheduler::new(&config(usize::MAX), &index, &routes, viewpoint()).unwrap();

        assert_eq!(scheduler.step(&mut ctx), StepOutcome::Blocked { cursor: 1 });
        ctx.release_oldest().expect("one active");
        assert_eq!(scheduler.step(&mut ctx), StepOutcome::Blocked { cursor: 2 });

        let stats = scheduler.drive(&mut ctx, |ctx, outcome| {
            if matches!(outcome, StepOutcome::Blocked { .. }) {
                ctx.release_oldest();
            }
        });
        assert_eq!(stats.chunks, 1);
        assert_eq!(stats.visible, 5);
    }

    #[test]
    fn test_collapsed_index_rejects_geometry() {
        // Every airport sits at the origin, so no arc direction exists
        let airports = [AirportRecord::new("A", 0.0, 0.0), AirportRecord::new("B", 0.0, 10.0)];
        let index = PositionIndex::from_airports(&airports, 0.0);
        let routes = vec![Route::new("A", "B"), Route::new("B", "A")];
        let mut ctx = context(usize::MAX);
        let config = config(10).with_cull_distance(3.0 * R);
        let mut scheduler = VisibilityScheduler::new(&config, &index, &routes, viewpoint()).unwrap();

        let stats = scheduler.drive(&mut ctx, |_, _| {});
        assert_eq!(stats.rejected_geometry, 2);
        assert_eq!(stats.visible, 0);
        assert_eq!(stats.culled, 0);
        assert_eq!(ctx.pool().stats().acquisitions, 0);
    }
}

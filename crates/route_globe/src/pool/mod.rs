//! Route Renderer Pool
//!
//! Pre-creates route renderers and hands them out by handle so a
//! visualization pass does not construct a renderer per route.
//!
//! # Architecture
//!
//! ```text
//! RoutePool<R>
//!     ├── SlotMap<RouteHandle, PoolEntry<R>>   (every renderer ever created)
//!     └── VecDeque<RouteHandle>                (free list, oldest first)
//!                 ↓
//!          acquire() / release()
//! ```
//!
//! Acquisition never fails: an empty free list grows the pool by exactly one
//! renderer from the factory. There is no upper bound; callers that need a
//! ceiling enforce it themselves (see `VisualizationContext`).
//!
//! # Usage
//!
//! ```rust
//! use route_globe::pool::RoutePool;
//! use route_globe::render::HeadlessRouteRenderer;
//!
//! let mut pool = RoutePool::new(2, HeadlessRouteRenderer::new);
//! let handle = pool.acquire();
//! // draw with pool.get_mut(handle) ...
//! pool.release(handle).expect("handle came from this pool");
//! ```

use std::collections::VecDeque;

use slotmap::SlotMap;
use thiserror::Error;

slotmap::new_key_type! {
    /// Handle to a pooled route renderer
    pub struct RouteHandle;
}

/// Pool misuse errors
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// The handle was not issued by this pool
    #[error("Route handle {0:?} does not belong to this pool")]
    UnknownHandle(RouteHandle),

    /// The handle is already on the free list
    #[error("Route handle {0:?} is not checked out")]
    NotCheckedOut(RouteHandle),
}

/// Statistics for pool usage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Renderers created, including the initial allocation
    pub created: usize,
    /// Renderers created because the free list was empty
    pub grown: usize,
    /// Successful acquisitions
    pub acquisitions: u64,
    /// Successful releases
    pub releases: u64,
    /// Handles currently checked out
    pub checked_out: usize,
    /// Maximum number of handles checked out simultaneously
    pub peak_checked_out: usize,
}

struct PoolEntry<R> {
    renderer: R,
    checked_out: bool,
}

/// Growable pool of route renderers
pub struct RoutePool<R> {
    entries: SlotMap<RouteHandle, PoolEntry<R>>,
    free_list: VecDeque<RouteHandle>,
    factory: Box<dyn FnMut() -> R>,
    stats: PoolStats,
}

impl<R> RoutePool<R> {
    /// Create a pool with `initial_size` renderers built by `factory`
    pub fn new(initial_size: usize, factory: impl FnMut() -> R + 'static) -> Self {
        let mut pool = Self {
            entries: SlotMap::with_capacity_and_key(initial_size),
            free_list: VecDeque::with_capacity(initial_size),
            factory: Box::new(factory),
            stats: PoolStats::default(),
        };

        for _ in 0..initial_size {
            let handle = pool.create_entry();
            pool.free_list.push_back(handle);
        }

        log::info!("Created RoutePool with {} renderers", initial_size);
        pool
    }

    /// Take a free renderer, growing the pool by one if none is free
    ///
    /// The renderer is handed out in whatever state it was released in; the
    /// caller is responsible for activating it.
    pub fn acquire(&mut self) -> RouteHandle {
        let handle = match self.free_list.pop_front() {
            Some(handle) => handle,
            None => {
                let handle = self.create_entry();
                self.stats.grown += 1;
                log::debug!("RoutePool exhausted, grew to {} renderers", self.entries.len());
                handle
            }
        };

        if let Some(entry) = self.entries.get_mut(handle) {
            entry.checked_out = true;
        }

        self.stats.acquisitions += 1;
        self.stats.checked_out += 1;
        self.stats.peak_checked_out = self.stats.peak_checked_out.max(self.stats.checked_out);
        handle
    }

    /// Return a checked-out renderer to the free list
    pub fn release(&mut self, handle: RouteHandle) -> Result<(), PoolError> {
        let entry = self
            .entries
            .get_mut(handle)
            .ok_or(PoolError::UnknownHandle(handle))?;

        if !entry.checked_out {
            return Err(PoolError::NotCheckedOut(handle));
        }

        entry.checked_out = false;
        self.free_list.push_back(handle);
        self.stats.releases += 1;
        self.stats.checked_out = self.stats.checked_out.saturating_sub(1);
        Ok(())
    }

    /// Renderer behind a handle
    pub fn get(&self, handle: RouteHandle) -> Option<&R> {
        self.entries.get(handle).map(|entry| &entry.renderer)
    }

    /// Mutable renderer behind a handle
    pub fn get_mut(&mut self, handle: RouteHandle) -> Option<&mut R> {
        self.entries.get_mut(handle).map(|entry| &mut entry.renderer)
    }

    /// Whether the handle is currently checked out
    pub fn is_checked_out(&self, handle: RouteHandle) -> bool {
        self.entries.get(handle).is_some_and(|entry| entry.checked_out)
    }

    /// Iterate over every renderer with its handle
    pub fn iter(&self) -> impl Iterator<Item = (RouteHandle, &R)> {
        self.entries.iter().map(|(handle, entry)| (handle, &entry.renderer))
    }

    /// Total number of renderers owned by the pool
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the pool owns no renderers
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renderers on the free list
    pub fn available(&self) -> usize {
        self.free_list.len()
    }

    /// Renderers currently checked out
    pub fn checked_out(&self) -> usize {
        self.stats.checked_out
    }

    /// Get pool statistics
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    fn create_entry(&mut self) -> RouteHandle {
        let renderer = (self.factory)();
        self.stats.created += 1;
        self.entries.insert(PoolEntry {
            renderer,
            checked_out: false,
        })
    }
}

impl<R> std::fmt::Debug for RoutePool<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutePool")
            .field("len", &self.entries.len())
            .field("available", &self.free_list.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessRouteRenderer;
    use std::collections::HashSet;

    fn pool(size: usize) -> RoutePool<HeadlessRouteRenderer> {
        RoutePool::new(size, HeadlessRouteRenderer::new)
    }

    #[test]
    fn test_initial_allocation() {
        let pool = pool(10);
        assert_eq!(pool.len(), 10);
        assert_eq!(pool.available(), 10);
        assert_eq!(pool.checked_out(), 0);
        assert_eq!(pool.stats().created, 10);
    }

    #[test]
    fn test_distinct_handles_then_growth() {
        let mut pool = pool(4);

        let handles: HashSet<_> = (0..4).map(|_| pool.acquire()).collect();
        assert_eq!(handles.len(), 4);
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.stats().grown, 0);

        let extra = pool.acquire();
        assert!(!handles.contains(&extra));
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.stats().grown, 1);
        assert_eq!(pool.stats().peak_checked_out, 5);
    }

    #[test]
    fn test_empty_pool_grows_on_demand() {
        let mut pool = pool(0);
        assert!(pool.is_empty());

        let handle = pool.acquire();
        assert_eq!(pool.len(), 1);
        assert!(pool.is_checked_out(handle));
    }

    #[test]
    fn test_release_reuses_renderer() {
        let mut pool = pool(2);
        let first = pool.acquire();
        let second = pool.acquire();

        pool.release(first).expect("checked out");
        assert_eq!(pool.available(), 1);

        let reused = pool.acquire();
        assert_eq!(reused, first);
        assert_ne!(reused, second);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.stats().releases, 1);
    }

    #[test]
    fn test_free_list_is_fifo() {
        let mut pool = pool(3);
        let handles: Vec<_> = (0..3).map(|_| pool.acquire()).collect();

        pool.release(handles[2]).unwrap();
        pool.release(handles[0]).unwrap();

        assert_eq!(pool.acquire(), handles[2]);
        assert_eq!(pool.acquire(), handles[0]);
    }

    #[test]
    fn test_double_release_is_rejected() {
        let mut pool = pool(1);
        let handle = pool.acquire();

        pool.release(handle).expect("first release");
        assert_eq!(pool.release(handle), Err(PoolError::NotCheckedOut(handle)));
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn test_foreign_handle_is_rejected() {
        let mut other = pool(1);
        let foreign = other.acquire();

        let mut pool = pool(0);
        assert_eq!(pool.release(foreign), Err(PoolError::UnknownHandle(foreign)));
    }

    #[test]
    fn test_renderer_access() {
        use crate::render::RouteRenderer;

        let mut pool = pool(1);
        let handle = pool.acquire();
        pool.get_mut(handle).expect("pooled").set_active(true);

        assert!(pool.get(handle).expect("pooled").is_active());
        assert_eq!(pool.iter().count(), 1);
    }
}

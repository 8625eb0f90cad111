//! Generic reuse pool for short-lived spawned entities.
//!
//! Entities are constructed once through an injected factory and then cycled
//! between a LIFO availability stack and a hash map of active entries keyed
//! by handle. Handle indirection keeps "is this thing currently live"
//! bookkeeping separate from the entity's own state and makes release O(1)
//! no matter how many entities are pooled.

use std::collections::HashMap;

use crate::constants::pools::GROWTH_INCREMENT;

/// Capability set a pooled entity must provide.
///
/// `activate` places the entity into the world at the given placement;
/// `deactivate` puts it into its dormant, non-interactive state.
pub trait Poolable {
    type Placement;

    fn activate(&mut self, placement: &Self::Placement);
    fn deactivate(&mut self);
}

/// Opaque identifier for an active pooled entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolHandle(pub u32);

/// Entity constructor injected at pool creation. May fail; the pool never
/// fabricates an entity itself.
pub type Factory<T> = Box<dyn FnMut() -> Option<T>>;

pub struct ObjectPool<T: Poolable> {
    /// Handle -> entity, for everything currently in play.
    active: HashMap<PoolHandle, T>,
    /// Deactivated entities ready for reuse (LIFO).
    available: Vec<T>,
    factory: Factory<T>,
    next_handle: u32,
    total_size: usize,
}

impl<T: Poolable> ObjectPool<T> {
    /// Build a pool and pre-construct `initial_size` deactivated entities.
    ///
    /// The reported total size is `initial_size` even if the factory
    /// under-produces; growth later adds one per successful construction.
    pub fn new(factory: Factory<T>, initial_size: usize) -> Self {
        let mut pool = Self {
            active: HashMap::new(),
            available: Vec::with_capacity(initial_size),
            factory,
            next_handle: 0,
            total_size: initial_size,
        };

        for _ in 0..initial_size {
            if let Some(mut entity) = (pool.factory)() {
                entity.deactivate();
                pool.available.push(entity);
            }
        }

        pool
    }

    /// Take an entity from the pool, activate it at `placement`, and register
    /// it under a fresh handle.
    ///
    /// Grows the pool by a fixed increment when the availability stack is
    /// empty. Returns `None` only when the factory cannot produce more
    /// entities.
    pub fn acquire(&mut self, placement: &T::Placement) -> Option<PoolHandle> {
        if self.available.is_empty() {
            self.expand(GROWTH_INCREMENT);
        }

        let mut entity = self.available.pop()?;
        entity.activate(placement);

        let handle = PoolHandle(self.next_handle);
        self.next_handle += 1;
        self.active.insert(handle, entity);
        Some(handle)
    }

    /// Deactivate the entity registered under `handle` and return it to the
    /// availability stack. Unknown handles are a no-op; callers track handle
    /// validity themselves.
    pub fn release(&mut self, handle: PoolHandle) {
        if let Some(mut entity) = self.active.remove(&handle) {
            entity.deactivate();
            self.available.push(entity);
        }
    }

    /// Deactivate and reclaim every active entity in one pass.
    pub fn release_all(&mut self) {
        for (_, mut entity) in self.active.drain() {
            entity.deactivate();
            self.available.push(entity);
        }
    }

    pub fn find_active(&self, handle: PoolHandle) -> Option<&T> {
        self.active.get(&handle)
    }

    pub fn find_active_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.active.get_mut(&handle)
    }

    pub fn is_active(&self, handle: PoolHandle) -> bool {
        self.active.contains_key(&handle)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    pub fn total_size(&self) -> usize {
        self.total_size
    }

    /// Permanently dispose of every entity in both collections. Consuming
    /// teardown: the pool cannot be used afterward.
    pub fn destroy(mut self) {
        self.available.clear();
        self.active.clear();
    }

    fn expand(&mut self, additional: usize) {
        for _ in 0..additional {
            if let Some(mut entity) = (self.factory)() {
                entity.deactivate();
                self.available.push(entity);
                self.total_size += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal pooled entity: records its placement and live flag.
    #[derive(Debug, Default, PartialEq)]
    struct Probe {
        at: f32,
        live: bool,
    }

    impl Poolable for Probe {
        type Placement = f32;

        fn activate(&mut self, placement: &f32) {
            self.at = *placement;
            self.live = true;
        }

        fn deactivate(&mut self) {
            self.live = false;
        }
    }

    fn probe_pool(initial: usize) -> ObjectPool<Probe> {
        ObjectPool::new(Box::new(|| Some(Probe::default())), initial)
    }

    #[test]
    fn test_preallocation() {
        let pool = probe_pool(4);
        assert_eq!(pool.available_count(), 4);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.total_size(), 4);
    }

    #[test]
    fn test_acquire_activates_at_placement() {
        let mut pool = probe_pool(1);
        let handle = pool.acquire(&3.5).unwrap();

        let probe = pool.find_active(handle).unwrap();
        assert!(probe.live);
        assert_eq!(probe.at, 3.5);
        assert!(pool.is_active(handle));
    }

    #[test]
    fn test_handles_distinct_and_monotonic() {
        let mut pool = probe_pool(3);
        let a = pool.acquire(&0.0).unwrap();
        let b = pool.acquire(&0.0).unwrap();
        let c = pool.acquire(&0.0).unwrap();
        assert!(a < b && b < c);

        // Releasing never recycles a handle value.
        pool.release(b);
        let d = pool.acquire(&0.0).unwrap();
        assert!(d > c);
    }

    #[test]
    fn test_round_trip_no_growth() {
        let mut pool = probe_pool(2);
        let handle = pool.acquire(&1.0).unwrap();
        pool.release(handle);
        let _ = pool.acquire(&2.0).unwrap();

        assert_eq!(pool.total_size(), 2);
        assert_eq!(pool.active_count() + pool.available_count(), 2);
    }

    #[test]
    fn test_release_deactivates() {
        let mut pool = probe_pool(1);
        let handle = pool.acquire(&1.0).unwrap();
        pool.release(handle);

        assert!(!pool.is_active(handle));
        assert_eq!(pool.find_active(handle), None);
        assert_eq!(pool.available_count(), 1);
    }

    #[test]
    fn test_release_unknown_handle_is_noop() {
        let mut pool = probe_pool(2);
        let _ = pool.acquire(&0.0).unwrap();

        pool.release(PoolHandle(999));
        assert_eq!(pool.active_count(), 1);
        assert_eq!(pool.available_count(), 1);
    }

    #[test]
    fn test_growth_when_exhausted() {
        let mut pool = probe_pool(2);
        let a = pool.acquire(&0.0).unwrap();
        let b = pool.acquire(&0.0).unwrap();
        // Third acquire triggers growth by the fixed increment.
        let c = pool.acquire(&0.0).unwrap();

        assert_eq!(pool.active_count(), 3);
        assert_eq!(pool.available_count(), 4);
        assert_eq!(pool.total_size(), 7);

        pool.release(a);
        pool.release(b);
        pool.release(c);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.available_count(), 7);
    }

    #[test]
    fn test_failing_factory() {
        let mut pool: ObjectPool<Probe> = ObjectPool::new(Box::new(|| None), 3);
        assert_eq!(pool.available_count(), 0);
        assert_eq!(pool.acquire(&0.0), None);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_factory_runs_dry_mid_growth() {
        let mut remaining = 3;
        let factory: Factory<Probe> = Box::new(move || {
            if remaining > 0 {
                remaining -= 1;
                Some(Probe::default())
            } else {
                None
            }
        });

        let mut pool = ObjectPool::new(factory, 2);
        let _ = pool.acquire(&0.0).unwrap();
        let _ = pool.acquire(&0.0).unwrap();
        // Growth only manages one more entity before the factory dries up.
        let third = pool.acquire(&0.0);
        assert!(third.is_some());
        assert_eq!(pool.total_size(), 3);

        assert_eq!(pool.acquire(&0.0), None);
    }

    #[test]
    fn test_release_all() {
        let mut pool = probe_pool(3);
        let handles: Vec<_> = (0..3).map(|i| pool.acquire(&(i as f32)).unwrap()).collect();
        assert_eq!(pool.active_count(), 3);

        pool.release_all();
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.available_count(), 3);
        for handle in handles {
            assert!(!pool.is_active(handle));
        }
    }

    #[test]
    fn test_conservation() {
        let mut pool = probe_pool(5);
        let mut handles = Vec::new();
        for i in 0..8 {
            handles.push(pool.acquire(&(i as f32)).unwrap());
        }
        // Growth may have raised the total, never lowered it.
        assert!(pool.active_count() + pool.available_count() >= 5);

        for handle in handles {
            pool.release(handle);
        }
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.available_count(), pool.total_size());
    }
}

//! Shared resize observation
//!
//! One registry per thread, keyed by surface identity. The native observer
//! is told to watch a surface when its first listener arrives and to stop
//! when the last one leaves, at which point the entry is removed entirely.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::Size;

/// Identity of an observable surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Allocate a process-unique id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// The platform side of resize observation
pub trait ResizeObserver {
    fn observe(&mut self, surface: SurfaceId);
    fn unobserve(&mut self, surface: SurfaceId);
}

/// Observer for hosts with a single resize source (a terminal): it only
/// records which surfaces want sizes, and [`notify_all`] fans out to them.
#[derive(Debug, Default)]
pub struct ObservedSet {
    surfaces: HashSet<SurfaceId>,
}

impl ObservedSet {
    pub fn surfaces(&self) -> impl Iterator<Item = SurfaceId> + '_ {
        self.surfaces.iter().copied()
    }
}

impl ResizeObserver for ObservedSet {
    fn observe(&mut self, surface: SurfaceId) {
        self.surfaces.insert(surface);
    }

    fn unobserve(&mut self, surface: SurfaceId) {
        self.surfaces.remove(&surface);
    }
}

type Listener = Rc<RefCell<dyn FnMut(Size)>>;

pub struct ResizeRegistry<O> {
    observer: O,
    entries: HashMap<SurfaceId, Vec<(ListenerId, Listener)>>,
    next_listener: u64,
}

impl<O: ResizeObserver> ResizeRegistry<O> {
    pub fn new(observer: O) -> Self {
        Self {
            observer,
            entries: HashMap::new(),
            next_listener: 0,
        }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Register a listener; the first one for a surface starts observation
    pub fn add<F>(&mut self, surface: SurfaceId, listener: F) -> ListenerId
    where
        F: FnMut(Size) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        let listeners = self.entries.entry(surface).or_default();
        if listeners.is_empty() {
            self.observer.observe(surface);
            tracing::debug!(?surface, "resize observation started");
        }
        let listener: Listener = Rc::new(RefCell::new(listener));
        listeners.push((id, listener));
        id
    }

    /// Remove a listener; the last one for a surface ends observation.
    /// Returns false if it was not registered.
    pub fn remove(&mut self, surface: SurfaceId, id: ListenerId) -> bool {
        let Some(listeners) = self.entries.get_mut(&surface) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(l, _)| *l != id);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            self.entries.remove(&surface);
            self.observer.unobserve(surface);
            tracing::debug!(?surface, "resize observation ended");
        }
        removed
    }

    pub fn is_observed(&self, surface: SurfaceId) -> bool {
        self.entries.contains_key(&surface)
    }

    pub fn listener_count(&self, surface: SurfaceId) -> usize {
        self.entries.get(&surface).map_or(0, Vec::len)
    }

    /// Snapshot of a surface's listeners, so they can be invoked after the
    /// registry borrow is released
    fn listeners(&self, surface: SurfaceId) -> Vec<Listener> {
        self.entries
            .get(&surface)
            .map(|ls| ls.iter().map(|(_, l)| Rc::clone(l)).collect())
            .unwrap_or_default()
    }
}

thread_local! {
    static REGISTRY: RefCell<ResizeRegistry<ObservedSet>> =
        RefCell::new(ResizeRegistry::new(ObservedSet::default()));
}

/// Keeps a resize listener registered until dropped or disposed
#[derive(Debug)]
#[must_use = "the listener is removed when the guard is dropped"]
pub struct ResizeGuard {
    surface: SurfaceId,
    id: ListenerId,
    disposed: bool,
}

impl ResizeGuard {
    pub fn surface(&self) -> SurfaceId {
        self.surface
    }

    /// Remove the listener now; later calls and the drop are no-ops
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        // The registry may already be gone during thread teardown
        let _ = REGISTRY.try_with(|r| r.borrow_mut().remove(self.surface, self.id));
    }
}

impl Drop for ResizeGuard {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Listen for size changes of `surface` on this thread's registry
pub fn observe_resize<F>(surface: SurfaceId, listener: F) -> ResizeGuard
where
    F: FnMut(Size) + 'static,
{
    let id = REGISTRY.with(|r| r.borrow_mut().add(surface, listener));
    ResizeGuard {
        surface,
        id,
        disposed: false,
    }
}

/// Deliver a new size to every listener of `surface`
pub fn notify(surface: SurfaceId, size: Size) {
    let listeners = REGISTRY.with(|r| r.borrow().listeners(surface));
    for listener in listeners {
        // A listener re-entering its own notification is skipped
        if let Ok(mut f) = listener.try_borrow_mut() {
            (*f)(size);
        }
    }
}

/// Deliver a size to every observed surface (single-source hosts)
pub fn notify_all(size: Size) {
    let surfaces: Vec<SurfaceId> =
        REGISTRY.with(|r| r.borrow().observer().surfaces().collect());
    for surface in surfaces {
        notify(surface, size);
    }
}

pub fn is_observed(surface: SurfaceId) -> bool {
    REGISTRY.with(|r| r.borrow().is_observed(surface))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingObserver {
        observed: Vec<SurfaceId>,
        unobserved: Vec<SurfaceId>,
    }

    impl ResizeObserver for CountingObserver {
        fn observe(&mut self, surface: SurfaceId) {
            self.observed.push(surface);
        }

        fn unobserve(&mut self, surface: SurfaceId) {
            self.unobserved.push(surface);
        }
    }

    // ========== Registry ==========

    #[test]
    fn test_first_listener_observes_once() {
        let mut reg = ResizeRegistry::new(CountingObserver::default());
        let s = SurfaceId::next();
        reg.add(s, |_| {});
        reg.add(s, |_| {});
        assert_eq!(reg.observer().observed, vec![s]);
        assert_eq!(reg.listener_count(s), 2);
    }

    #[test]
    fn test_last_listener_unobserves_and_removes_entry() {
        let mut reg = ResizeRegistry::new(CountingObserver::default());
        let s = SurfaceId::next();
        let a = reg.add(s, |_| {});
        let b = reg.add(s, |_| {});
        assert!(reg.remove(s, a));
        assert!(reg.observer().unobserved.is_empty());
        assert!(reg.remove(s, b));
        assert_eq!(reg.observer().unobserved, vec![s]);
        assert!(!reg.is_observed(s));
        assert!(!reg.remove(s, b));
    }

    #[test]
    fn test_reregister_observes_exactly_once_more() {
        let mut reg = ResizeRegistry::new(CountingObserver::default());
        let s = SurfaceId::next();
        let a = reg.add(s, |_| {});
        reg.remove(s, a);
        reg.add(s, |_| {});
        assert_eq!(reg.observer().observed, vec![s, s]);
        assert_eq!(reg.observer().unobserved, vec![s]);
    }

    #[test]
    fn test_surfaces_are_independent() {
        let mut reg = ResizeRegistry::new(CountingObserver::default());
        let s1 = SurfaceId::next();
        let s2 = SurfaceId::next();
        let a = reg.add(s1, |_| {});
        reg.add(s2, |_| {});
        reg.remove(s1, a);
        assert!(!reg.is_observed(s1));
        assert!(reg.is_observed(s2));
    }

    // ========== Thread registry ==========

    #[test]
    fn test_guard_drop_unobserves() {
        let s = SurfaceId::next();
        let guard = observe_resize(s, |_| {});
        assert!(is_observed(s));
        drop(guard);
        assert!(!is_observed(s));
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let s = SurfaceId::next();
        let mut first = observe_resize(s, |_| {});
        let _second = observe_resize(s, |_| {});
        first.dispose();
        first.dispose();
        assert!(is_observed(s));
        drop(first);
        assert!(is_observed(s));
    }

    #[test]
    fn test_notify_reaches_listeners() {
        let s = SurfaceId::next();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _guard = observe_resize(s, move |size| sink.borrow_mut().push(size));
        notify(s, Size::new(320.0, 480.0));
        notify_all(Size::new(640.0, 480.0));
        assert_eq!(
            *seen.borrow(),
            vec![Size::new(320.0, 480.0), Size::new(640.0, 480.0)]
        );
    }

    #[test]
    fn test_listener_may_register_during_notify() {
        let s = SurfaceId::next();
        let spawned = Rc::new(RefCell::new(Vec::new()));
        let holder = Rc::clone(&spawned);
        let _guard = observe_resize(s, move |_| {
            holder.borrow_mut().push(observe_resize(s, |_| {}));
        });
        notify(s, Size::new(1.0, 1.0));
        assert_eq!(spawned.borrow().len(), 1);
        spawned.borrow_mut().clear();
        assert!(is_observed(s));
    }

    #[test]
    fn test_notify_after_dispose_is_silent() {
        let s = SurfaceId::next();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let guard = observe_resize(s, move |_| *counter.borrow_mut() += 1);
        drop(guard);
        notify(s, Size::new(10.0, 10.0));
        assert_eq!(*hits.borrow(), 0);
    }
}

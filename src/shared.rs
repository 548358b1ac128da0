//! Copy-on-write router handle.
//!
//! Readers take a snapshot with [`SharedRouter::load`] and match against it
//! without locking. Writers build a whole new [`Router`] and swap it in, so a
//! table is never mutated while it is being served.

use crate::router::Router;

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use tracing::debug;

pub struct SharedRouter<R> {
    inner: ArcSwap<Router<R>>,
}

impl<R> SharedRouter<R> {
    pub fn new(router: Router<R>) -> Self {
        Self {
            inner: ArcSwap::from_pointee(router),
        }
    }

    /// Current snapshot.
    pub fn load(&self) -> Arc<Router<R>> {
        self.inner.load_full()
    }

    /// Replaces the live router.
    pub fn store(&self, router: Router<R>) {
        debug!(routes = router.len(), "router swapped");
        self.inner.store(Arc::new(router));
    }

    /// Builds a new router from the current one and swaps it in, returning
    /// the previous one.
    ///
    /// Concurrent updates do not overwrite each other: if another writer
    /// swapped in between, `f` runs again on the newer router.
    pub fn update(&self, mut f: impl FnMut(&Router<R>) -> Router<R>) -> Arc<Router<R>> {
        self.inner.rcu(|current| {
            let next = f(&**current);
            debug!(old = current.len(), new = next.len(), "router rebuilt");
            Arc::new(next)
        })
    }
}

impl<R> fmt::Debug for SharedRouter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedRouter").field(&*self.inner.load()).finish()
    }
}

//! Thread-safe pool wrapper for hosts that drive spawning from several threads.
//!
//! One mutex guards the active and inactive sets as a unit, so spawn,
//! despawn and queries are mutually exclusive.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::host::Host;
use crate::pool::{Pool, SpawnRequest};

pub struct SharedPool<H: Host> {
    inner: Arc<Mutex<Pool<H>>>,
}

impl<H: Host> Clone for SharedPool<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: Host> SharedPool<H> {
    pub fn new(pool: Pool<H>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }

    /// Lock the pool, ignoring poisoning.
    pub fn lock(&self) -> MutexGuard<'_, Pool<H>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with exclusive access to the pool.
    pub fn with<R>(&self, f: impl FnOnce(&mut Pool<H>) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn spawn(&self, request: SpawnRequest<'_, H>) -> Option<H::Handle> {
        self.lock().spawn(request)
    }

    pub fn despawn(&self, handle: H::Handle) -> bool {
        self.lock().despawn(handle)
    }

    pub fn despawn_all(&self) {
        self.lock().despawn_all();
    }

    pub fn mark_active(&self, handle: H::Handle) -> bool {
        self.lock().mark_active(handle)
    }

    pub fn mark_inactive(&self, handle: H::Handle) -> bool {
        self.lock().mark_inactive(handle)
    }

    pub fn is_active(&self, handle: H::Handle) -> bool {
        self.lock().is_active(handle)
    }

    pub fn is_inactive(&self, handle: H::Handle) -> bool {
        self.lock().is_inactive(handle)
    }

    pub fn active_count(&self) -> usize {
        self.lock().active_count()
    }

    pub fn inactive_count(&self) -> usize {
        self.lock().inactive_count()
    }

    /// Copy of the active set, taken under the lock.
    pub fn active_snapshot(&self) -> Vec<H::Handle> {
        self.lock().active().to_vec()
    }
}

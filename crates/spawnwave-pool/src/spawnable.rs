//! The capability every poolable entity implements.

/// Opaque reference to the pool that owns a spawnling.
///
/// Spawnlings keep it to route their own despawn requests back to the
/// right pool without holding a borrow of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PoolHandle(u32);

impl PoolHandle {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Lifecycle hooks invoked synchronously by the owning pool.
pub trait Spawnable {
    /// Called after the entity entered the active set, whether it was
    /// freshly constructed or reused.
    fn on_spawn(&mut self, pool: PoolHandle);

    /// Called when the entity leaves the active set.
    fn on_despawn(&mut self, pool: PoolHandle);
}

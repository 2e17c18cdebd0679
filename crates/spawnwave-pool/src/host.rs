//! Seams to the host engine: entity instantiation and the scene census.

use std::fmt::Debug;
use std::hash::Hash;

use spawnwave_core::types::{Placement, Quat, Vec3};

use crate::spawnable::Spawnable;

/// Entity-instantiation service a [`Pool`](crate::Pool) delegates to.
///
/// Handles must stay valid (and unique) for as long as the entity exists;
/// the pool uses them as set keys.
pub trait Host {
    /// Identity of a live entity.
    type Handle: Copy + Eq + Hash + Debug;
    /// What spawnlings may be attached under.
    type Parent: Copy + PartialEq + Debug;
    /// Template a new entity is constructed from.
    type Prefab;
    /// The component receiving lifecycle hooks.
    type Spawnling: Spawnable;

    /// Construct a new live, visible entity from `prefab`.
    fn instantiate(
        &mut self,
        prefab: &Self::Prefab,
        placement: &Placement<Self::Parent>,
    ) -> Self::Handle;

    /// Move an existing entity.
    fn reposition(&mut self, handle: Self::Handle, position: Vec3, rotation: Quat);

    fn parent_of(&self, handle: Self::Handle) -> Option<Self::Parent>;

    fn set_parent(&mut self, handle: Self::Handle, parent: Self::Parent);

    /// Show/enable or hide/disable an entity without destroying it.
    fn set_active(&mut self, handle: Self::Handle, active: bool);

    /// Whether `handle` names an entity this host created and has not
    /// destroyed.
    fn contains(&self, handle: Self::Handle) -> bool;

    /// Permanently destroy an entity. The handle is dead afterwards.
    fn destroy(&mut self, handle: Self::Handle);

    fn spawnling_mut(&mut self, handle: Self::Handle) -> Option<&mut Self::Spawnling>;
}

/// "Are any live instances of the spawnling type present?"
///
/// Inactive (pooled) entities do not count as live.
pub trait SceneCensus {
    fn live_count(&self) -> usize;

    fn any_live(&self) -> bool {
        self.live_count() > 0
    }
}

//! Host for plain Rust objects with no scene behind them.
//!
//! New spawnlings are built with `T::default()`; "active" is a flag.

use spawnwave_core::types::{Placement, Quat, Vec3};

use crate::host::{Host, SceneCensus};
use crate::spawnable::Spawnable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub usize);

#[derive(Debug)]
struct Slot<T> {
    value: T,
    active: bool,
}

/// Objects live in slots indexed by [`ObjectId`]. Destroyed slots are never
/// reused, so an id always names the same object.
#[derive(Debug)]
pub struct CodeHost<T> {
    slots: Vec<Option<Slot<T>>>,
}

impl<T> Default for CodeHost<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T> CodeHost<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ObjectId) -> Option<&T> {
        self.slots.get(id.0)?.as_ref().map(|slot| &slot.value)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut T> {
        self.slots.get_mut(id.0)?.as_mut().map(|slot| &mut slot.value)
    }

    pub fn is_active(&self, id: ObjectId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(slot)) if slot.active)
    }

    pub fn is_destroyed(&self, id: ObjectId) -> bool {
        matches!(self.slots.get(id.0), Some(None))
    }

    /// Number of objects ever constructed.
    pub fn constructed(&self) -> usize {
        self.slots.len()
    }

    /// Insert an object created elsewhere (for [`Pool::adopt`](crate::Pool::adopt)).
    pub fn insert(&mut self, value: T) -> ObjectId {
        self.slots.push(Some(Slot {
            value,
            active: false,
        }));
        ObjectId(self.slots.len() - 1)
    }
}

impl<T: Spawnable + Default> Host for CodeHost<T> {
    type Handle = ObjectId;
    type Parent = ObjectId;
    type Prefab = ();
    type Spawnling = T;

    fn instantiate(&mut self, _prefab: &(), _placement: &Placement<ObjectId>) -> ObjectId {
        self.slots.push(Some(Slot {
            value: T::default(),
            active: true,
        }));
        ObjectId(self.slots.len() - 1)
    }

    fn reposition(&mut self, _handle: ObjectId, _position: Vec3, _rotation: Quat) {}

    fn parent_of(&self, _handle: ObjectId) -> Option<ObjectId> {
        None
    }

    fn set_parent(&mut self, _handle: ObjectId, _parent: ObjectId) {}

    fn set_active(&mut self, handle: ObjectId, active: bool) {
        if let Some(Some(slot)) = self.slots.get_mut(handle.0) {
            slot.active = active;
        }
    }

    fn contains(&self, handle: ObjectId) -> bool {
        matches!(self.slots.get(handle.0), Some(Some(_)))
    }

    fn destroy(&mut self, handle: ObjectId) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            *slot = None;
        }
    }

    fn spawnling_mut(&mut self, handle: ObjectId) -> Option<&mut T> {
        self.get_mut(handle)
    }
}

impl<T> SceneCensus for CodeHost<T> {
    fn live_count(&self) -> usize {
        self.slots.iter().flatten().filter(|slot| slot.active).count()
    }
}

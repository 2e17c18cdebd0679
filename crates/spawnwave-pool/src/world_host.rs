//! Host backed by a hecs world.
//!
//! Instantiating clones the prefab component `T` into a new entity alongside
//! a [`SceneTransform`] and a [`Visible`] flag. Deactivated entities stay in
//! the world, hidden, until destroyed.

use std::marker::PhantomData;

use hecs::{Entity, World};

use spawnwave_core::types::{Placement, Quat, Vec3};

use crate::host::{Host, SceneCensus};
use crate::spawnable::Spawnable;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Whether the entity takes part in the scene. Hidden entities are skipped
/// by the census.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visible(pub bool);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub Entity);

pub struct WorldHost<T> {
    world: World,
    _spawnling: PhantomData<fn() -> T>,
}

impl<T> Default for WorldHost<T> {
    fn default() -> Self {
        Self::new(World::new())
    }
}

impl<T> WorldHost<T> {
    pub fn new(world: World) -> Self {
        Self {
            world,
            _spawnling: PhantomData,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn transform(&self, entity: Entity) -> Option<SceneTransform> {
        self.world.get::<&SceneTransform>(entity).ok().map(|t| *t)
    }

    pub fn is_visible(&self, entity: Entity) -> bool {
        self.world
            .get::<&Visible>(entity)
            .map(|v| v.0)
            .unwrap_or(false)
    }
}

impl<T> Host for WorldHost<T>
where
    T: Spawnable + Clone + Send + Sync + 'static,
{
    type Handle = Entity;
    type Parent = Entity;
    type Prefab = T;
    type Spawnling = T;

    fn instantiate(&mut self, prefab: &T, placement: &Placement<Entity>) -> Entity {
        let entity = self.world.spawn((
            prefab.clone(),
            SceneTransform {
                position: placement.position,
                rotation: placement.rotation,
            },
            Visible(true),
        ));
        if let Some(parent) = placement.parent {
            let _ = self.world.insert_one(entity, Parent(parent));
        }
        entity
    }

    fn reposition(&mut self, handle: Entity, position: Vec3, rotation: Quat) {
        if let Ok(mut transform) = self.world.get::<&mut SceneTransform>(handle) {
            transform.position = position;
            transform.rotation = rotation;
        }
    }

    fn parent_of(&self, handle: Entity) -> Option<Entity> {
        self.world.get::<&Parent>(handle).ok().map(|p| p.0)
    }

    fn set_parent(&mut self, handle: Entity, parent: Entity) {
        let _ = self.world.insert_one(handle, Parent(parent));
    }

    fn set_active(&mut self, handle: Entity, active: bool) {
        if let Ok(mut visible) = self.world.get::<&mut Visible>(handle) {
            visible.0 = active;
        }
    }

    fn contains(&self, handle: Entity) -> bool {
        self.world.get::<&T>(handle).is_ok()
    }

    fn destroy(&mut self, handle: Entity) {
        let _ = self.world.despawn(handle);
    }

    fn spawnling_mut(&mut self, handle: Entity) -> Option<&mut T> {
        self.world.query_one_mut::<&mut T>(handle).ok()
    }
}

impl<T> SceneCensus for WorldHost<T>
where
    T: Send + Sync + 'static,
{
    fn live_count(&self) -> usize {
        let mut query = self.world.query::<(&T, &Visible)>();
        query.iter().filter(|(_, (_, visible))| visible.0).count()
    }
}

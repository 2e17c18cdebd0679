//! Generic object pool partitioned into active and inactive sets.
//!
//! Every entity a pool owns is in exactly one of the two sets. The ordered
//! `Vec`s keep spawn order for index addressing and LIFO reuse, the
//! membership map answers set queries in O(1).

use std::collections::HashMap;
use std::iter::Copied;
use std::slice;

use log::{debug, warn};

use spawnwave_core::config::PoolConfig;
use spawnwave_core::enums::Membership;
use spawnwave_core::types::{Placement, Quat, Vec3};

use crate::host::Host;
use crate::spawnable::{PoolHandle, Spawnable};

/// Read-only, restartable iteration over the active set.
pub type ActiveIter<'a, H> = Copied<slice::Iter<'a, <H as Host>::Handle>>;

/// Arguments of a single spawn. Everything is optional; an empty request
/// spawns the default prefab at the origin.
pub struct SpawnRequest<'a, H: Host> {
    prefab: Option<&'a H::Prefab>,
    placement: Placement<H::Parent>,
    on_construct: Option<&'a mut dyn FnMut(&mut H::Spawnling)>,
}

impl<H: Host> Default for SpawnRequest<'_, H> {
    fn default() -> Self {
        Self {
            prefab: None,
            placement: Placement::default(),
            on_construct: None,
        }
    }
}

impl<'a, H: Host> SpawnRequest<'a, H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct from this variant instead of the pool's default prefab.
    /// Ignored when an inactive entity is reused.
    pub fn prefab(mut self, prefab: &'a H::Prefab) -> Self {
        self.prefab = Some(prefab);
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.placement.position = position;
        self
    }

    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.placement.rotation = rotation;
        self
    }

    pub fn parent(mut self, parent: H::Parent) -> Self {
        self.placement.parent = Some(parent);
        self
    }

    pub fn placement(mut self, placement: Placement<H::Parent>) -> Self {
        self.placement = placement;
        self
    }

    /// Run `hook` on the spawnling right after it is constructed.
    /// Reused entities skip it.
    pub fn on_construct(mut self, hook: &'a mut dyn FnMut(&mut H::Spawnling)) -> Self {
        self.on_construct = Some(hook);
        self
    }
}

pub struct Pool<H: Host> {
    host: H,
    handle: PoolHandle,
    default_prefab: H::Prefab,
    config: PoolConfig,
    active: Vec<H::Handle>,
    inactive: Vec<H::Handle>,
    membership: HashMap<H::Handle, Membership>,
    next_index: usize,
}

impl<H: Host> Pool<H> {
    /// Create an empty pool with the default configuration.
    pub fn new(host: H, default_prefab: H::Prefab) -> Self {
        Self {
            host,
            handle: PoolHandle::default(),
            default_prefab,
            config: PoolConfig::default(),
            active: Vec::new(),
            inactive: Vec::new(),
            membership: HashMap::new(),
            next_index: 0,
        }
    }

    pub fn with_config(mut self, config: PoolConfig) -> Self {
        self.config = config;
        self
    }

    /// Identity passed to the lifecycle hooks.
    pub fn with_handle(mut self, handle: PoolHandle) -> Self {
        self.handle = handle;
        self
    }

    pub fn handle(&self) -> PoolHandle {
        self.handle
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PoolConfig {
        &mut self.config
    }

    pub fn default_prefab(&self) -> &H::Prefab {
        &self.default_prefab
    }

    pub fn set_default_prefab(&mut self, prefab: H::Prefab) {
        self.default_prefab = prefab;
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    // --- Spawning ---

    /// Activate a spawnling, reusing the most recently deactivated one when
    /// pooling is enabled. Returns `None` when the pool is at `max_spawns`.
    pub fn spawn(&mut self, request: SpawnRequest<'_, H>) -> Option<H::Handle> {
        let SpawnRequest {
            prefab,
            placement,
            mut on_construct,
        } = request;
        self.spawn_one(prefab, &placement, on_construct.as_deref_mut())
    }

    /// Spawn the default prefab at the origin.
    pub fn spawn_default(&mut self) -> Option<H::Handle> {
        self.spawn(SpawnRequest::new())
    }

    fn spawn_one<'h>(
        &mut self,
        prefab: Option<&H::Prefab>,
        placement: &Placement<H::Parent>,
        on_construct: Option<&mut (dyn FnMut(&mut H::Spawnling) + 'h)>,
    ) -> Option<H::Handle> {
        if self.config.at_capacity(self.active.len()) {
            debug!(
                "pool {:?} at capacity ({} active), spawn refused",
                self.handle,
                self.active.len()
            );
            return None;
        }

        let handle = match self.pop_reusable() {
            Some(handle) => {
                self.host
                    .reposition(handle, placement.position, placement.rotation);
                if let Some(parent) = placement.parent {
                    if self.host.parent_of(handle) != Some(parent) {
                        self.host.set_parent(handle, parent);
                    }
                }
                debug!("pool {:?} reused {:?}", self.handle, handle);
                handle
            }
            None => {
                let prefab = prefab.unwrap_or(&self.default_prefab);
                let handle = self.host.instantiate(prefab, placement);
                if let Some(hook) = on_construct {
                    if let Some(spawnling) = self.host.spawnling_mut(handle) {
                        hook(spawnling);
                    }
                }
                debug!("pool {:?} constructed {:?}", self.handle, handle);
                handle
            }
        };

        self.host.set_active(handle, true);
        self.active.push(handle);
        self.membership.insert(handle, Membership::Active);
        self.notify_spawn(handle);
        Some(handle)
    }

    /// LIFO: the last entity despawned is the next one reused.
    fn pop_reusable(&mut self) -> Option<H::Handle> {
        if !self.config.use_pooling {
            return None;
        }
        let handle = self.inactive.pop()?;
        self.membership.remove(&handle);
        Some(handle)
    }

    // --- Despawning ---

    /// Deactivate a spawnling. Entities that are not currently active
    /// (inactive, released or never owned) are ignored and `false` is returned.
    pub fn despawn(&mut self, handle: H::Handle) -> bool {
        if !self.is_active(handle) {
            debug!(
                "pool {:?} ignored despawn of non-active {:?}",
                self.handle, handle
            );
            return false;
        }
        remove_from(&mut self.active, handle);
        self.retire(handle);
        true
    }

    /// Despawn every active spawnling, in spawn order.
    pub fn despawn_all(&mut self) {
        let active = std::mem::take(&mut self.active);
        for handle in active {
            self.retire(handle);
        }
    }

    /// Apply the pooling policy to an entity that just left the active set.
    fn retire(&mut self, handle: H::Handle) {
        self.notify_despawn(handle);

        if self.config.use_pooling {
            self.inactive.push(handle);
            self.membership.insert(handle, Membership::Inactive);
            self.host.set_active(handle, false);
            return;
        }

        // Unpooled entities leave the pool for good.
        self.membership.remove(&handle);
        if self.config.destroy_unpooled {
            self.host.destroy(handle);
            debug!("pool {:?} destroyed {:?}", self.handle, handle);
        } else {
            self.host.set_active(handle, false);
        }
    }

    // --- Reclassification ---

    /// Move an entity into the active set after it was activated outside of
    /// `spawn`. Entities the pool does not own yet are adopted if the host
    /// knows them. Returns `false` if it already is active, the host has no
    /// such entity, or the pool is at `max_spawns`.
    pub fn mark_active(&mut self, handle: H::Handle) -> bool {
        match self.membership.get(&handle) {
            Some(Membership::Active) => return false,
            Some(Membership::Inactive) => {
                if self.config.at_capacity(self.active.len()) {
                    return false;
                }
                remove_from(&mut self.inactive, handle);
            }
            None => {
                if !self.knows(handle) || self.config.at_capacity(self.active.len()) {
                    return false;
                }
            }
        }

        self.active.push(handle);
        self.membership.insert(handle, Membership::Active);
        self.host.set_active(handle, true);
        self.notify_spawn(handle);
        true
    }

    /// Move an entity into the inactive set after it was deactivated outside
    /// of `despawn`. Returns `false` if it already is inactive or the host has
    /// no such entity.
    pub fn mark_inactive(&mut self, handle: H::Handle) -> bool {
        match self.membership.get(&handle) {
            Some(Membership::Inactive) => return false,
            Some(Membership::Active) => remove_from(&mut self.active, handle),
            None => {
                if !self.knows(handle) {
                    return false;
                }
            }
        }

        self.inactive.push(handle);
        self.membership.insert(handle, Membership::Inactive);
        self.notify_despawn(handle);
        self.host.set_active(handle, false);
        true
    }

    /// Take ownership of entities that already exist in the scene, treating
    /// each as freshly spawned. Returns how many were adopted.
    pub fn adopt(&mut self, existing: impl IntoIterator<Item = H::Handle>) -> usize {
        existing
            .into_iter()
            .filter(|&handle| self.mark_active(handle))
            .count()
    }

    /// Adoption guard: a handle the host never created (or already
    /// destroyed) would alias a future construction.
    fn knows(&self, handle: H::Handle) -> bool {
        if self.host.contains(handle) {
            return true;
        }
        debug!("pool {:?} refused unknown {:?}", self.handle, handle);
        false
    }

    // --- Queries ---

    pub fn is_active(&self, handle: H::Handle) -> bool {
        self.membership.get(&handle) == Some(&Membership::Active)
    }

    pub fn is_inactive(&self, handle: H::Handle) -> bool {
        self.membership.get(&handle) == Some(&Membership::Inactive)
    }

    pub fn membership(&self, handle: H::Handle) -> Option<Membership> {
        self.membership.get(&handle).copied()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn inactive_count(&self) -> usize {
        self.inactive.len()
    }

    /// Active spawnlings in spawn order.
    pub fn active(&self) -> &[H::Handle] {
        &self.active
    }

    pub fn iter(&self) -> ActiveIter<'_, H> {
        self.active.iter().copied()
    }

    // --- Index addressing ---

    /// The `index`-th active spawnling. When there is none, either spawn a
    /// single new one (`force_fill == false`) or spawn until the slot exists
    /// (`force_fill == true`), returning whatever then sits at `index`.
    pub fn get_by_index(
        &mut self,
        index: usize,
        request: SpawnRequest<'_, H>,
        force_fill: bool,
    ) -> Option<H::Handle> {
        if let Some(&handle) = self.active.get(index) {
            return Some(handle);
        }

        let SpawnRequest {
            prefab,
            placement,
            mut on_construct,
        } = request;

        if !force_fill {
            return self.spawn_one(prefab, &placement, on_construct.as_deref_mut());
        }

        let gap = index + 1 - self.active.len();
        if gap > self.config.max_fill {
            warn!(
                "pool {:?}: filling up to index {} needs {} spawns, over the limit of {}",
                self.handle, index, gap, self.config.max_fill
            );
            return None;
        }

        for _ in 0..gap {
            self.spawn_one(prefab, &placement, on_construct.as_deref_mut())?;
        }
        self.active.get(index).copied()
    }

    /// Stateful [`get_by_index`](Self::get_by_index). Forced calls walk an
    /// internal cursor one slot per call; unforced calls point the cursor at
    /// the current active count.
    pub fn get_next(
        &mut self,
        request: SpawnRequest<'_, H>,
        force_fill: bool,
    ) -> Option<H::Handle> {
        let index = if force_fill {
            let index = self.next_index;
            self.next_index += 1;
            index
        } else {
            self.next_index = self.active.len();
            self.next_index
        };
        self.get_by_index(index, request, force_fill)
    }

    pub fn next_index(&self) -> usize {
        self.next_index
    }

    pub fn reset_cursor(&mut self) {
        self.next_index = 0;
    }

    // --- Hooks ---

    fn notify_spawn(&mut self, handle: H::Handle) {
        let pool = self.handle;
        if let Some(spawnling) = self.host.spawnling_mut(handle) {
            spawnling.on_spawn(pool);
        }
    }

    fn notify_despawn(&mut self, handle: H::Handle) {
        let pool = self.handle;
        if let Some(spawnling) = self.host.spawnling_mut(handle) {
            spawnling.on_despawn(pool);
        }
    }
}

impl<'a, H: Host> IntoIterator for &'a Pool<H> {
    type Item = H::Handle;
    type IntoIter = ActiveIter<'a, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn remove_from<T: PartialEq>(list: &mut Vec<T>, item: T) {
    if let Some(i) = list.iter().position(|x| *x == item) {
        list.remove(i);
    }
}

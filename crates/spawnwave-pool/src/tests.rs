//! Tests for the pool, its hosts and the shared wrapper.

use std::collections::HashSet;

use hecs::World;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use spawnwave_core::config::PoolConfig;
use spawnwave_core::enums::Membership;
use spawnwave_core::types::{Quat, Vec3};

use crate::code_host::{CodeHost, ObjectId};
use crate::host::{Host, SceneCensus};
use crate::pool::{Pool, SpawnRequest};
use crate::shared::SharedPool;
use crate::spawnable::{PoolHandle, Spawnable};
use crate::world_host::WorldHost;

#[derive(Debug, Default, Clone)]
struct Probe {
    kind: u32,
    spawns: u32,
    despawns: u32,
    constructed_with: Option<u32>,
    last_pool: Option<PoolHandle>,
}

impl Spawnable for Probe {
    fn on_spawn(&mut self, pool: PoolHandle) {
        self.spawns += 1;
        self.last_pool = Some(pool);
    }

    fn on_despawn(&mut self, _pool: PoolHandle) {
        self.despawns += 1;
    }
}

fn code_pool(config: PoolConfig) -> Pool<CodeHost<Probe>> {
    Pool::new(CodeHost::new(), ()).with_config(config)
}

fn pooled() -> PoolConfig {
    PoolConfig {
        use_pooling: true,
        ..Default::default()
    }
}

fn unpooled(destroy: bool) -> PoolConfig {
    PoolConfig {
        use_pooling: false,
        destroy_unpooled: destroy,
        ..Default::default()
    }
}

// ---- Spawn / despawn ----

#[test]
fn test_spawn_marks_active() {
    let mut pool = code_pool(pooled());
    let a = pool.spawn_default().unwrap();
    assert!(pool.is_active(a));
    assert!(!pool.is_inactive(a));
    assert_eq!(pool.active_count(), 1);
    assert!(pool.host().is_active(a), "Host should show the spawnling");
}

#[test]
fn test_despawn_marks_inactive() {
    let mut pool = code_pool(pooled());
    let a = pool.spawn_default().unwrap();
    assert!(pool.despawn(a));
    assert!(!pool.is_active(a));
    assert!(pool.is_inactive(a));
    assert_eq!(pool.active_count(), 0);
    assert_eq!(pool.inactive_count(), 1);
    assert!(!pool.host().is_active(a), "Pooled spawnling should be hidden");
    assert!(!pool.host().is_destroyed(a), "Pooled spawnling must not be destroyed");
}

#[test]
fn test_active_count_after_spawns_and_despawns() {
    let mut pool = code_pool(unpooled(false));
    let handles: Vec<_> = (0..5).map(|_| pool.spawn_default().unwrap()).collect();
    pool.despawn(handles[1]);
    pool.despawn(handles[3]);
    assert_eq!(pool.active_count(), 3);

    pool.despawn_all();
    assert_eq!(pool.active_count(), 0);
}

#[test]
fn test_despawn_all_pools_every_active() {
    let mut pool = code_pool(pooled());
    let a = pool.spawn_default().unwrap();
    let b = pool.spawn_default().unwrap();
    pool.despawn_all();
    assert_eq!(pool.active_count(), 0);
    assert_eq!(pool.inactive_count(), 2);
    assert!(pool.is_inactive(a) && pool.is_inactive(b));
    assert_eq!(pool.host().get(a).unwrap().despawns, 1);
    assert_eq!(pool.host().get(b).unwrap().despawns, 1);
}

#[test]
fn test_pooling_reuses_same_object() {
    let mut pool = code_pool(pooled());
    let first = pool.spawn_default().unwrap();
    pool.despawn(first);
    let second = pool.spawn_default().unwrap();
    assert_eq!(first, second, "Pooling did not reuse the same object");
    assert_eq!(pool.host().constructed(), 1);
}

#[test]
fn test_pooling_reuse_is_lifo() {
    let mut pool = code_pool(pooled());
    let a = pool.spawn_default().unwrap();
    let b = pool.spawn_default().unwrap();
    pool.despawn(a);
    pool.despawn(b);
    assert_eq!(pool.spawn_default(), Some(b));
    assert_eq!(pool.spawn_default(), Some(a));
}

#[test]
fn test_unpooled_spawns_fresh_objects() {
    let mut pool = code_pool(unpooled(false));
    let first = pool.spawn_default().unwrap();
    pool.despawn(first);
    let second = pool.spawn_default().unwrap();
    pool.despawn(second);
    assert_ne!(first, second, "Not pooling reused the same object");

    // Released entities are neither active nor inactive, and not destroyed.
    assert_eq!(pool.membership(first), None);
    assert!(!pool.host().is_destroyed(first));
    assert_eq!(pool.inactive_count(), 0);
}

#[test]
fn test_unpooled_destroy_is_permanent() {
    let mut pool = code_pool(unpooled(true));
    let a = pool.spawn_default().unwrap();
    pool.despawn(a);
    assert!(pool.host().is_destroyed(a));
    assert_eq!(pool.inactive_count(), 0);

    let b = pool.spawn_default().unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_inactive_not_reused_when_pooling_disabled() {
    let mut pool = code_pool(pooled());
    let a = pool.spawn_default().unwrap();
    pool.despawn(a);

    pool.config_mut().use_pooling = false;
    let b = pool.spawn_default().unwrap();
    assert_ne!(a, b);
    assert!(pool.is_inactive(a), "Parked entity stays in the inactive set");
}

// ---- Capacity ----

#[test]
fn test_max_spawns_caps_active_set() {
    let mut pool = code_pool(PoolConfig {
        max_spawns: 3,
        ..Default::default()
    });
    for _ in 0..3 {
        assert!(pool.spawn_default().is_some());
    }
    assert!(pool.spawn_default().is_none(), "Spawn past the cap should fail");
    assert_eq!(pool.active_count(), 3);

    let first = pool.active()[0];
    pool.despawn(first);
    assert_eq!(pool.spawn_default(), Some(first), "Freed slot reuses the pooled entity");
}

// ---- Lenient misuse ----

#[test]
fn test_despawn_inactive_is_ignored() {
    let mut pool = code_pool(pooled());
    let a = pool.spawn_default().unwrap();
    assert!(pool.despawn(a));
    assert!(!pool.despawn(a));
    assert_eq!(pool.inactive_count(), 1, "No duplicate in the inactive set");
    assert_eq!(pool.host().get(a).unwrap().despawns, 1);
}

#[test]
fn test_despawn_unknown_is_ignored() {
    let mut pool = code_pool(pooled());
    pool.spawn_default();
    assert!(!pool.despawn(ObjectId(99)));
    assert_eq!(pool.active_count(), 1);
}

// ---- Lifecycle hooks ----

#[test]
fn test_hooks_receive_pool_handle() {
    let mut pool = code_pool(pooled()).with_handle(PoolHandle::new(7));
    let a = pool.spawn_default().unwrap();
    let probe = pool.host().get(a).unwrap();
    assert_eq!(probe.spawns, 1);
    assert_eq!(probe.last_pool, Some(PoolHandle::new(7)));
}

#[test]
fn test_reuse_calls_on_spawn_again() {
    let mut pool = code_pool(pooled());
    let a = pool.spawn_default().unwrap();
    pool.despawn(a);
    pool.spawn_default();
    let probe = pool.host().get(a).unwrap();
    assert_eq!(probe.spawns, 2);
    assert_eq!(probe.despawns, 1);
}

#[test]
fn test_construct_hook_skipped_on_reuse() {
    let mut pool = code_pool(pooled());
    let mut calls = 0;
    let mut hook = |p: &mut Probe| {
        calls += 1;
        p.constructed_with = Some(5);
    };
    let a = pool
        .spawn(SpawnRequest::new().on_construct(&mut hook))
        .unwrap();
    pool.despawn(a);
    let b = pool
        .spawn(SpawnRequest::new().on_construct(&mut hook))
        .unwrap();
    assert_eq!(a, b);
    assert_eq!(calls, 1, "Reuse bypasses construction");
    assert_eq!(pool.host().get(a).unwrap().constructed_with, Some(5));
}

// ---- Reclassification ----

#[test]
fn test_mark_active_is_idempotent() {
    let mut pool = code_pool(pooled());
    let a = pool.spawn_default().unwrap();
    assert!(!pool.mark_active(a));
    assert_eq!(pool.active_count(), 1);
    assert_eq!(pool.host().get(a).unwrap().spawns, 1);
}

#[test]
fn test_mark_inactive_then_active_moves_between_sets() {
    let mut pool = code_pool(pooled());
    let a = pool.spawn_default().unwrap();

    assert!(pool.mark_inactive(a));
    assert!(!pool.mark_inactive(a));
    assert_eq!((pool.active_count(), pool.inactive_count()), (0, 1));
    assert_eq!(pool.host().get(a).unwrap().despawns, 1);

    assert!(pool.mark_active(a));
    assert_eq!((pool.active_count(), pool.inactive_count()), (1, 0));
    assert_eq!(pool.host().get(a).unwrap().spawns, 2);
    assert!(pool.host().is_active(a));
}

#[test]
fn test_mark_active_respects_cap() {
    let mut pool = code_pool(PoolConfig {
        max_spawns: 1,
        ..Default::default()
    });
    let a = pool.spawn_default().unwrap();
    let stray = pool.host_mut().insert(Probe::default());
    assert!(!pool.mark_active(stray));
    pool.despawn(a);
    assert!(pool.mark_active(stray));
    assert_eq!(pool.active(), &[stray]);
}

#[test]
fn test_adopt_existing_objects() {
    let mut pool = code_pool(pooled());
    let existing: Vec<_> = (0..3)
        .map(|kind| pool.host_mut().insert(Probe { kind, ..Default::default() }))
        .collect();
    assert_eq!(pool.adopt(existing.clone()), 3);
    assert_eq!(pool.active(), existing.as_slice());
    for id in &existing {
        assert_eq!(pool.host().get(*id).unwrap().spawns, 1);
        assert!(pool.host().is_active(*id));
    }
}

#[test]
fn test_mark_refuses_handles_the_host_never_created() {
    let mut pool = code_pool(pooled());
    assert!(!pool.mark_active(ObjectId(0)));
    assert!(!pool.mark_inactive(ObjectId(3)));
    assert_eq!(pool.membership(ObjectId(0)), None);
    assert_eq!(pool.inactive_count(), 0);

    let a = pool.spawn_default().unwrap();
    assert_eq!(a, ObjectId(0));
    assert_eq!(pool.active(), &[a], "Constructed id must not be listed twice");
}

#[test]
fn test_adopt_skips_unknown_handles() {
    let mut pool = code_pool(pooled());
    let real = pool.host_mut().insert(Probe::default());
    assert_eq!(pool.adopt([real, ObjectId(7)]), 1);
    assert_eq!(pool.active(), &[real]);
}

#[test]
fn test_mark_refuses_destroyed_handles() {
    let mut pool = code_pool(unpooled(true));
    let a = pool.spawn_default().unwrap();
    pool.despawn(a);
    assert!(pool.host().is_destroyed(a));
    assert!(!pool.mark_active(a), "Destroyed entity must not come back");
    assert!(!pool.mark_inactive(a));
    let b = pool.spawn_default().unwrap();
    assert_ne!(a, b, "Spawn must never return a destroyed handle");
}

// ---- Index addressing ----

#[test]
fn test_get_by_index_returns_existing() {
    let mut pool = code_pool(pooled());
    let a = pool.spawn_default().unwrap();
    let b = pool.spawn_default().unwrap();
    assert_eq!(pool.get_by_index(1, SpawnRequest::new(), true), Some(b));
    assert_eq!(pool.get_by_index(0, SpawnRequest::new(), false), Some(a));
    assert_eq!(pool.active_count(), 2);
}

#[test]
fn test_get_by_index_unforced_spawns_one() {
    let mut pool = code_pool(pooled());
    let got = pool.get_by_index(5, SpawnRequest::new(), false);
    assert!(got.is_some());
    assert_eq!(pool.active_count(), 1);
}

#[test]
fn test_get_by_index_forced_fills_gap() {
    let mut pool = code_pool(pooled());
    pool.spawn_default();
    let got = pool.get_by_index(4, SpawnRequest::new(), true).unwrap();
    assert_eq!(pool.active_count(), 5);
    assert_eq!(pool.active()[4], got);
}

#[test]
fn test_get_by_index_forced_stops_at_cap() {
    let mut pool = code_pool(PoolConfig {
        max_spawns: 3,
        ..Default::default()
    });
    assert!(pool.get_by_index(5, SpawnRequest::new(), true).is_none());
    assert_eq!(pool.active_count(), 3);
}

#[test]
fn test_get_by_index_forced_over_fill_limit() {
    let mut pool = code_pool(PoolConfig {
        max_fill: 10,
        ..Default::default()
    });
    assert!(pool.get_by_index(50, SpawnRequest::new(), true).is_none());
    assert_eq!(pool.active_count(), 0, "Refused fill must not spawn anything");
    assert!(pool.get_by_index(9, SpawnRequest::new(), true).is_some());
    assert_eq!(pool.active_count(), 10);
}

#[test]
fn test_get_next_forced_walks_slots() {
    let mut pool = code_pool(pooled());
    let slot0 = pool.get_next(SpawnRequest::new(), true).unwrap();
    let slot1 = pool.get_next(SpawnRequest::new(), true).unwrap();
    assert_ne!(slot0, slot1);
    assert_eq!(pool.next_index(), 2);

    pool.reset_cursor();
    assert_eq!(pool.get_next(SpawnRequest::new(), true), Some(slot0));
    assert_eq!(pool.get_next(SpawnRequest::new(), true), Some(slot1));
    assert_eq!(pool.active_count(), 2, "Revisited slots do not spawn");
}

#[test]
fn test_get_next_unforced_tracks_active_count() {
    let mut pool = code_pool(pooled());
    pool.spawn_default();
    pool.spawn_default();
    let c = pool.get_next(SpawnRequest::new(), false).unwrap();
    assert_eq!(pool.next_index(), 2);
    assert_eq!(pool.active()[2], c);
    assert_eq!(pool.active_count(), 3);
}

// ---- Iteration ----

#[test]
fn test_iteration_covers_active_only() {
    let mut pool = code_pool(pooled());
    let a = pool.spawn_default().unwrap();
    let b = pool.spawn_default().unwrap();
    let c = pool.spawn_default().unwrap();
    pool.despawn(b);

    let first: Vec<_> = pool.iter().collect();
    let second: Vec<_> = (&pool).into_iter().collect();
    assert_eq!(first, vec![a, c]);
    assert_eq!(first, second, "Iteration should be restartable");
}

// ---- Set invariant ----

fn assert_partitioned(pool: &Pool<CodeHost<Probe>>) {
    let active: HashSet<_> = pool.active().iter().copied().collect();
    assert_eq!(active.len(), pool.active_count(), "Duplicate in active set");
    for id in pool.active() {
        assert_eq!(pool.membership(*id), Some(Membership::Active));
        assert!(!pool.is_inactive(*id));
    }
    let inactive: Vec<_> = (0..pool.host().constructed())
        .map(ObjectId)
        .filter(|id| pool.is_inactive(*id))
        .collect();
    assert_eq!(inactive.len(), pool.inactive_count(), "Inactive set out of sync");
    assert!(inactive.iter().all(|id| !active.contains(id)));
}

#[test]
fn test_random_operations_keep_sets_partitioned() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let mut pool = code_pool(PoolConfig {
        max_spawns: 12,
        ..Default::default()
    });

    for _ in 0..2_000 {
        let known = pool.host().constructed();
        // Two ids past the constructed range are never handed out by the host.
        let pick = ObjectId(rng.gen_range(0..known + 2));
        match rng.gen_range(0..6) {
            0 | 1 => {
                pool.spawn_default();
            }
            2 => {
                pool.despawn(pick);
            }
            3 => {
                pool.mark_active(pick);
            }
            4 => {
                pool.mark_inactive(pick);
            }
            _ => {
                if rng.gen_bool(0.05) {
                    pool.despawn_all();
                }
            }
        }
        assert!(pool.active_count() <= 12);
        assert_partitioned(&pool);
    }
}

// ---- World host ----

#[derive(Debug, Clone, Default)]
struct Grunt {
    hp: i32,
    spawns: u32,
}

impl Spawnable for Grunt {
    fn on_spawn(&mut self, _pool: PoolHandle) {
        self.spawns += 1;
        self.hp = 3;
    }

    fn on_despawn(&mut self, _pool: PoolHandle) {}
}

fn world_pool(config: PoolConfig) -> Pool<WorldHost<Grunt>> {
    Pool::new(WorldHost::default(), Grunt::default()).with_config(config)
}

#[test]
fn test_world_host_places_new_entity() {
    let mut pool = world_pool(pooled());
    let parent = pool.host_mut().world_mut().spawn(());
    let rot = Quat::from_rotation_z(0.5);
    let e = pool
        .spawn(
            SpawnRequest::new()
                .at(Vec3::new(1.0, 2.0, 0.0))
                .rotated(rot)
                .parent(parent),
        )
        .unwrap();

    let t = pool.host().transform(e).unwrap();
    assert_eq!(t.position, Vec3::new(1.0, 2.0, 0.0));
    assert_eq!(t.rotation, rot);
    assert_eq!(pool.host().parent_of(e), Some(parent));
    assert!(pool.host().is_visible(e));
    assert_eq!(pool.host().world().get::<&Grunt>(e).unwrap().hp, 3);
}

#[test]
fn test_world_host_reuse_repositions_and_reparents() {
    let mut pool = world_pool(pooled());
    let first_parent = pool.host_mut().world_mut().spawn(());
    let second_parent = pool.host_mut().world_mut().spawn(());

    let e = pool
        .spawn(SpawnRequest::new().at(Vec3::X).parent(first_parent))
        .unwrap();
    pool.despawn(e);
    assert!(!pool.host().is_visible(e));

    let again = pool
        .spawn(SpawnRequest::new().at(Vec3::Y).parent(second_parent))
        .unwrap();
    assert_eq!(e, again);
    assert_eq!(pool.host().transform(e).unwrap().position, Vec3::Y);
    assert_eq!(pool.host().parent_of(e), Some(second_parent));
    assert_eq!(pool.host().world().get::<&Grunt>(e).unwrap().spawns, 2);
}

#[test]
fn test_world_host_variant_prefab() {
    let mut pool = world_pool(pooled());
    let brute = Grunt { hp: 10, spawns: 0 };
    let mut hook = |g: &mut Grunt| g.hp += 100;
    let e = pool
        .spawn(SpawnRequest::new().prefab(&brute).on_construct(&mut hook))
        .unwrap();
    // on_spawn resets hp after the construct hook ran.
    assert_eq!(pool.host().world().get::<&Grunt>(e).unwrap().hp, 3);
}

#[test]
fn test_set_default_prefab_affects_new_constructions() {
    let mut pool = world_pool(pooled());
    let old = pool.spawn_default().unwrap();
    pool.despawn(old);

    pool.set_default_prefab(Grunt { hp: 0, spawns: 5 });
    assert_eq!(pool.default_prefab().spawns, 5);

    let reused = pool.spawn_default().unwrap();
    assert_eq!(reused, old, "Reuse ignores the template");
    let fresh = pool.spawn_default().unwrap();
    assert_eq!(pool.host().world().get::<&Grunt>(fresh).unwrap().spawns, 6);
}

#[test]
fn test_world_census_ignores_hidden() {
    let mut pool = world_pool(pooled());
    let a = pool.spawn_default().unwrap();
    pool.spawn_default();
    assert_eq!(pool.host().live_count(), 2);
    pool.despawn(a);
    assert_eq!(pool.host().live_count(), 1);
    pool.despawn_all();
    assert!(!pool.host().any_live());
}

#[test]
fn test_world_host_destroy_unpooled() {
    let mut pool = world_pool(unpooled(true));
    let e = pool.spawn_default().unwrap();
    pool.despawn(e);
    assert!(!pool.host().world().contains(e));
}

#[test]
fn test_world_adopts_scene_entities() {
    let mut world = World::new();
    let placed = world.spawn((
        Grunt::default(),
        crate::world_host::SceneTransform {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        },
        crate::world_host::Visible(false),
    ));
    let mut pool = Pool::new(WorldHost::new(world), Grunt::default());
    assert_eq!(pool.adopt([placed]), 1);
    assert!(pool.host().is_visible(placed));
    assert_eq!(pool.host().live_count(), 1);
}

#[test]
fn test_world_refuses_despawned_entity() {
    let mut pool = world_pool(PoolConfig {
        use_pooling: false,
        destroy_unpooled: true,
        max_spawns: 1,
        ..Default::default()
    });
    let e = pool.spawn_default().unwrap();
    pool.despawn(e);
    assert!(!pool.mark_active(e), "Dead entity must not take the only slot");
    assert_eq!(pool.active_count(), 0);
    assert!(pool.spawn_default().is_some());
}

// ---- Code host census ----

#[test]
fn test_code_census_counts_active() {
    let mut pool = code_pool(pooled());
    let a = pool.spawn_default().unwrap();
    pool.spawn_default();
    pool.despawn(a);
    assert_eq!(pool.host().live_count(), 1);
}

// ---- Shared pool ----

#[test]
fn test_shared_pool_respects_cap_across_threads() {
    let shared = SharedPool::new(code_pool(PoolConfig {
        max_spawns: 25,
        ..Default::default()
    }));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let pool = shared.clone();
            std::thread::spawn(move || {
                (0..10)
                    .filter(|_| pool.spawn(SpawnRequest::new()).is_some())
                    .count()
            })
        })
        .collect();
    let spawned: usize = workers.into_iter().map(|w| w.join().unwrap()).sum();

    assert_eq!(spawned, 25);
    assert_eq!(shared.active_count(), 25);

    let snapshot = shared.active_snapshot();
    assert!(shared.despawn(snapshot[0]));
    assert!(shared.is_inactive(snapshot[0]));
    shared.despawn_all();
    assert_eq!(shared.with(|p| p.inactive_count()), 25);
}

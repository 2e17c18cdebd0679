//! wave-sim: headless wave sequencer runner.
//!
//! Usage:
//!   wave-sim demo [--ticks N] [--verbose]
//!   wave-sim run --config waves.json [--power-ups power_ups.json] [--ticks N] [--verbose]
//!
//! Events are printed to stdout as JSON lines; logs go to stderr.

use std::path::{Path, PathBuf};
use std::process;

use log::{info, LevelFilter, Log, Metadata, Record};
use serde::{Deserialize, Serialize};

use spawnwave_core::constants::{DT, TICK_RATE};
use spawnwave_core::events::WaveEvent;
use spawnwave_core::types::Vec3;
use spawnwave_pool::{Pool, PoolHandle, SceneTransform, Spawnable, WorldHost};
use spawnwave_sampler::SpawnRegion;
use spawnwave_sequencer::{
    BasicWave, Scenario, SequencerConfig, SequencerError, Wave, WaveSequencer,
};

/// Default run length: two minutes of scheduler time.
const DEFAULT_TICKS: u64 = TICK_RATE as u64 * 120;

// --- Spawnlings ---

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Enemy {
    name: String,
    speed: f32,
    #[serde(skip)]
    route: Vec<Vec3>,
    #[serde(skip)]
    next_waypoint: usize,
}

impl Spawnable for Enemy {
    fn on_spawn(&mut self, pool: PoolHandle) {
        self.next_waypoint = 0;
        log::trace!("{} spawned from pool {}", self.name, pool.id());
    }

    fn on_despawn(&mut self, _pool: PoolHandle) {
        self.route.clear();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PowerUp {
    name: String,
    lifetime_secs: f32,
    #[serde(skip)]
    remaining_secs: f32,
}

impl Spawnable for PowerUp {
    fn on_spawn(&mut self, _pool: PoolHandle) {
        self.remaining_secs = self.lifetime_secs;
    }

    fn on_despawn(&mut self, _pool: PoolHandle) {
        self.remaining_secs = 0.0;
    }
}

/// A wave of enemies that walk `path` and leave the scene at its end.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EnemyWave {
    count: u32,
    variants: Vec<Enemy>,
    time_between_spawns: f32,
    path: Vec<Vec3>,
}

impl Wave for EnemyWave {
    type Prefab = Enemy;

    fn count(&self) -> u32 {
        self.count
    }

    fn variants(&self) -> &[Enemy] {
        &self.variants
    }

    fn time_between_spawns(&self) -> f32 {
        self.time_between_spawns
    }
}

type EnemySequencer = WaveSequencer<WorldHost<Enemy>, EnemyWave>;
type PowerUpSequencer = WaveSequencer<WorldHost<PowerUp>, BasicWave<PowerUp>>;

// --- Logging ---

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

// --- CLI ---

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let rest = &args[2..];
    init_logging(rest.iter().any(|a| a == "--verbose" || a == "-v"));

    match args[1].as_str() {
        "demo" => cmd_demo(rest),
        "run" => cmd_run(rest),
        "help" | "--help" | "-h" => print_usage(),
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!(
        "wave-sim: headless wave sequencer runner\n\
         \n\
         Commands:\n\
         \n\
         demo      Run the built-in enemy and power-up waves\n\
         \n\
         run       Run waves from a scenario file\n\
         \n\
           --config <path>     Enemy wave scenario (JSON)\n\
           --power-ups <path>  Power-up wave scenario (JSON, optional)\n\
         \n\
         Common options:\n\
         \n\
           --ticks <N>         Stop after N ticks (default: {DEFAULT_TICKS})\n\
           --verbose, -v       Log wave boundaries and refused spawns\n\
         \n\
         Examples:\n\
         \n\
           wave-sim demo --verbose\n\
           wave-sim run --config tools/wave-sim/scenarios/ambush.json\n"
    );
}

fn parse_path(args: &[String], flag: &str) -> Option<PathBuf> {
    for i in 0..args.len() {
        if args[i] == flag && i + 1 < args.len() {
            return Some(PathBuf::from(&args[i + 1]));
        }
    }
    None
}

fn parse_ticks(args: &[String]) -> u64 {
    for i in 0..args.len() {
        if args[i] == "--ticks" && i + 1 < args.len() {
            if let Ok(n) = args[i + 1].parse::<u64>() {
                return n;
            }
        }
    }
    DEFAULT_TICKS
}

fn load_or_exit<W: serde::de::DeserializeOwned>(path: &Path) -> Scenario<W> {
    match Scenario::load(path) {
        Ok(scenario) => scenario,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

// --- Demo command ---

fn demo_enemies() -> Scenario<EnemyWave> {
    let grunt = Enemy {
        name: "grunt".into(),
        speed: 2.0,
        route: Vec::new(),
        next_waypoint: 0,
    };
    let runner = Enemy {
        name: "runner".into(),
        speed: 4.0,
        ..grunt.clone()
    };
    let path = vec![
        Vec3::new(-10.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(0.0, 8.0, 0.0),
        Vec3::new(10.0, 8.0, 0.0),
    ];

    Scenario {
        config: SequencerConfig {
            time_between_waves: 3.0,
            region: SpawnRegion::Circle {
                center: Some(Vec3::new(-10.0, 0.0, 0.0)),
                radius: 1.5,
                planar: true,
            },
            ..Default::default()
        },
        waves: vec![
            EnemyWave {
                count: 5,
                variants: vec![grunt.clone()],
                time_between_spawns: 1.0,
                path: path.clone(),
            },
            EnemyWave {
                count: 8,
                variants: vec![grunt, runner],
                time_between_spawns: 0.5,
                path,
            },
        ],
    }
}

fn demo_power_ups() -> Scenario<BasicWave<PowerUp>> {
    let power_up = |name: &str, lifetime_secs: f32| PowerUp {
        name: name.into(),
        lifetime_secs,
        remaining_secs: 0.0,
    };

    Scenario {
        config: SequencerConfig {
            time_between_waves: 5.0,
            seed: 7,
            region: SpawnRegion::Box {
                min: Vec3::new(-8.0, -4.0, 0.0),
                max: Vec3::new(8.0, 12.0, 0.0),
            },
            ..Default::default()
        },
        waves: vec![
            BasicWave::new(2, vec![power_up("shield", 6.0)], 2.0),
            BasicWave::new(3, vec![power_up("shield", 6.0), power_up("haste", 4.0)], 1.5),
        ],
    }
}

fn cmd_demo(args: &[String]) {
    let ticks = parse_ticks(args);
    simulate(demo_enemies(), Some(demo_power_ups()), ticks);
}

// --- Run command ---

fn cmd_run(args: &[String]) {
    let config = match parse_path(args, "--config") {
        Some(p) => p,
        None => {
            eprintln!("Error: --config <path> is required");
            process::exit(1);
        }
    };
    let enemies = load_or_exit::<EnemyWave>(&config);
    let power_ups = parse_path(args, "--power-ups").map(|p| load_or_exit::<BasicWave<PowerUp>>(&p));

    simulate(enemies, power_ups, parse_ticks(args));
}

// --- Simulation ---

fn enemy_sequencer(scenario: Scenario<EnemyWave>) -> EnemySequencer {
    let default_enemy = scenario
        .waves
        .iter()
        .find_map(|w| w.variants.first().cloned())
        .unwrap_or(Enemy {
            name: "enemy".into(),
            speed: 2.0,
            route: Vec::new(),
            next_waypoint: 0,
        });

    WaveSequencer::new(
        WorldHost::default(),
        default_enemy,
        scenario.waves,
        scenario.config,
    )
    .with_on_spawned(|pool, spawned| {
        let world = pool.host_mut().world_mut();
        if let Ok(mut enemy) = world.get::<&mut Enemy>(spawned.entity) {
            enemy.route = spawned.wave.path.clone();
        }
        true
    })
}

fn power_up_sequencer(scenario: Scenario<BasicWave<PowerUp>>) -> PowerUpSequencer {
    let default_power_up = PowerUp {
        name: "power_up".into(),
        lifetime_secs: 5.0,
        remaining_secs: 0.0,
    };
    WaveSequencer::new(
        WorldHost::default(),
        default_power_up,
        scenario.waves,
        scenario.config,
    )
}

/// Move enemies along their routes. Enemies at the end of the route leave
/// the scene.
fn walk_enemies(pool: &mut Pool<WorldHost<Enemy>>) {
    let mut arrived = Vec::new();
    for (entity, (transform, enemy)) in pool
        .host_mut()
        .world_mut()
        .query_mut::<(&mut SceneTransform, &mut Enemy)>()
    {
        let Some(target) = enemy.route.get(enemy.next_waypoint).copied() else {
            continue;
        };
        let step = enemy.speed * DT;
        let to_target = target - transform.position;
        if to_target.length() <= step {
            transform.position = target;
            enemy.next_waypoint += 1;
            if enemy.next_waypoint == enemy.route.len() {
                arrived.push(entity);
            }
        } else {
            transform.position += to_target.normalize() * step;
        }
    }
    for entity in arrived {
        pool.despawn(entity);
    }
}

/// Count down power-up lifetimes and despawn the expired ones.
fn expire_power_ups(pool: &mut Pool<WorldHost<PowerUp>>) {
    let mut expired = Vec::new();
    for &entity in pool.active() {
        if let Ok(mut power_up) = pool.host().world().get::<&mut PowerUp>(entity) {
            power_up.remaining_secs -= DT;
            if power_up.remaining_secs <= 0.0 {
                expired.push(entity);
            }
        }
    }
    for entity in expired {
        pool.despawn(entity);
    }
}

fn print_events(tick: u64, source: &str, events: Vec<WaveEvent>) {
    for event in events {
        let line = serde_json::json!({ "tick": tick, "source": source, "event": event });
        println!("{line}");
    }
}

fn exit_on_error(result: Result<(), SequencerError>) {
    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn simulate(
    enemies: Scenario<EnemyWave>,
    power_ups: Option<Scenario<BasicWave<PowerUp>>>,
    max_ticks: u64,
) {
    let mut enemies = enemy_sequencer(enemies);
    let mut power_ups = power_ups.map(power_up_sequencer);

    exit_on_error(enemies.start());
    if let Some(seq) = power_ups.as_mut() {
        exit_on_error(seq.start());
    }
    print_events(0, "enemies", enemies.drain_events());
    if let Some(seq) = power_ups.as_mut() {
        print_events(0, "power_ups", seq.drain_events());
    }

    let mut tick = 0;
    while tick < max_ticks {
        tick += 1;

        exit_on_error(enemies.tick(DT));
        walk_enemies(enemies.pool_mut());
        print_events(tick, "enemies", enemies.drain_events());

        if let Some(seq) = power_ups.as_mut() {
            exit_on_error(seq.tick(DT));
            expire_power_ups(seq.pool_mut());
            print_events(tick, "power_ups", seq.drain_events());
        }

        let power_ups_done = power_ups.as_ref().map_or(true, |seq| seq.is_drained());
        if enemies.is_drained() && power_ups_done {
            break;
        }
    }

    info!(
        "stopped after {} ticks ({:.2}s): {} enemies constructed, {} active",
        tick,
        enemies.elapsed().elapsed_secs,
        enemies.pool().host().world().len(),
        enemies.pool().active_count(),
    );
    if let Some(seq) = power_ups.as_ref() {
        info!(
            "power-ups: {} constructed, {} active",
            seq.pool().host().world().len(),
            seq.pool().active_count(),
        );
    }
    if !enemies.is_drained() {
        eprintln!("Tick limit reached before all waves drained");
    }
}

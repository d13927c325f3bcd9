//! Headless sandbox driver
//!
//! Loads a simulation configuration (TOML or RON, optional first argument),
//! builds the demo scene, ticks the world at 60 Hz, reports collisions and
//! writes the final scene snapshot (optional second argument).

mod demo_scene;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use sim_engine::foundation::logging;
use sim_engine::prelude::*;

const FRAME_TIME: f32 = 1.0 / 60.0;
const FRAMES: u32 = 600;
const DEFAULT_SNAPSHOT: &str = "sandbox_scene.ron";

/// Driver errors
#[derive(thiserror::Error, Debug)]
enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("scene error: {0}")]
    Scene(#[from] SceneError),
}

#[derive(Default)]
struct CollisionStats {
    contacts: u32,
    trigger_hits: u32,
}

fn main() {
    logging::init(logging::LevelFilter::Info);

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let snapshot_path = args.next().map_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT), PathBuf::from);

    if let Err(err) = run(config_path, &snapshot_path) {
        log::error!("Sandbox failed: {err}");
        std::process::exit(1);
    }
}

fn run(config_path: Option<PathBuf>, snapshot_path: &Path) -> Result<(), AppError> {
    let config = match config_path {
        Some(path) => {
            log::info!("Loading configuration from {}", path.display());
            SimulationConfig::load_from_file(&path)?
        }
        None => SimulationConfig::default(),
    };
    log::info!(
        "Physics step {:.4}s, gravity {:?}, restitution {}",
        config.physics.fixed_time_step,
        config.physics.gravity.as_slice(),
        config.physics.restitution
    );

    let mut world = World::with_config(&config.scheduler);
    let scene = demo_scene::build(&mut world);

    let stats = Rc::new(RefCell::new(CollisionStats::default()));
    let mut physics = PhysicsSystem::new(config.physics.clone());
    let sink = Rc::clone(&stats);
    let zone = scene.zone;
    physics.on_collision(move |info| {
        let mut stats = sink.borrow_mut();
        stats.contacts += 1;
        if info.is_trigger && (info.entity_a == zone || info.entity_b == zone) {
            stats.trigger_hits += 1;
            log::debug!("{} / {} overlapped the goal zone", info.entity_a, info.entity_b);
        }
    });
    world.add_system(physics);
    world.add_system(demo_scene::SweeperSystem::new(scene.sweeper, 3.0, 6.0));

    let stopwatch = Stopwatch::start_new();
    for frame in 0..FRAMES {
        world.update(FRAME_TIME);
        if frame % 120 == 0 {
            let heights: Vec<String> = scene
                .balls
                .iter()
                .filter_map(|ball| world.world_position(*ball))
                .map(|position| format!("{:.2}", position.y))
                .collect();
            log::info!("Frame {frame}: ball heights [{}]", heights.join(", "));
        }
    }
    log::info!(
        "Simulated {FRAMES} frames in {:.2} ms",
        stopwatch.elapsed_millis()
    );

    if let Some(physics) = world.system::<PhysicsSystem>() {
        let probe = physics.raycast(&world, Vec3::new(-2.25, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 20.0);
        match probe {
            Some(hit) => log::info!(
                "Probe ray hit {} at distance {:.3}",
                world.name(hit.entity).unwrap_or("?"),
                hit.distance
            ),
            None => log::info!("Probe ray hit nothing"),
        }
        log::info!(
            "{} physics steps, {:.2}s simulated",
            physics.steps_taken(),
            physics.simulated_time()
        );
    }

    let stats = stats.borrow();
    log::info!(
        "{} contacts reported, {} goal zone overlaps",
        stats.contacts,
        stats.trigger_hits
    );
    log::info!("Floor still at {:?}", world.world_position(scene.floor).map(|p| p.y));

    SceneDocument::capture(&world).save_to_file(snapshot_path)?;
    log::info!("Wrote scene snapshot to {}", snapshot_path.display());
    Ok(())
}

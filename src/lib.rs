#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Sim
//!
//! The simulation core of a voxel game: an entity-component runtime, box and
//! voxel-mesh collision with rigidbody physics, and a chunked world that is
//! generated and streamed around a moving loader.
//!
//! Rendering stops at the [`Renderer`](engine_state::rendering::Renderer)
//! boundary: meshes are built here and handed to whatever implements it. The
//! bundled binary runs the simulation headless.
//!
//! ## Key Modules
//!
//! * `core` - Shared-ownership handles used throughout the engine
//! * `engine_state` - Game objects, physics, voxels, rendering boundary and the tick loop
//! * `config` - Tunables, loaded from JSON
//! * `error` - The crate's error type
//!
//! ## Usage
//!
//! ```rust
//! use voxel_sim::{config::EngineConfig, engine_state::EngineState};
//!
//! let mut engine = EngineState::new(EngineConfig {
//!     render_distance: 0,
//!     ..EngineConfig::default()
//! });
//! engine.tick();
//! assert_eq!(engine.ticks(), 1);
//! ```

use std::{path::PathBuf, process};

use cgmath::Vector3;
use clap::Parser;
use log::{error, info};

use config::EngineConfig;
use engine_state::{
    entity::{Component, ComponentKind},
    physics::{Collider, Rigidbody},
    rendering::MeshRenderer,
    voxels::{
        block::block_type::BlockType,
        generation::GroundGenerator,
        World,
    },
    EngineState,
};

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

const SIMULATION_STOPWATCH: &str = "Simulation";

/// Size of the player's box collider.
pub const PLAYER_SIZE: Vector3<f32> = Vector3::new(0.6, 1.8, 0.6);
/// How far above the terrain surface the player is dropped.
const SPAWN_CLEARANCE: f32 = 10.0;

/// Headless voxel simulation
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON configuration file. Missing fields keep their defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of fixed ticks to run.
    #[arg(long)]
    ticks: Option<u64>,

    /// Terrain seed.
    #[arg(long)]
    seed: Option<u32>,
}

/// What a headless run ended with.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSummary {
    pub ticks: u64,
    pub loaded_chunks: usize,
    pub player_position: Vector3<f32>,
    pub player_grounded: bool,
}

/// Runs `config.tick_count` ticks with a player falling onto generated
/// terrain while the world streams around it.
pub fn simulate(config: EngineConfig) -> SimulationSummary {
    let ground = GroundGenerator::new(config.seed);
    let spawn = Vector3::new(8.0, ground.height_at(8, 8) as f32 + SPAWN_CLEARANCE, 8.0);
    let tick_count = config.tick_count;

    let mut engine = EngineState::new(config);
    let ctx = engine.context();

    let player = ctx.game_objects.create_at("player", spawn);
    for component in [
        Box::new(Collider::box_collider(PLAYER_SIZE)) as Box<dyn Component>,
        Box::new(Rigidbody::new()),
        Box::new(MeshRenderer::block(BlockType::WOOD.id())),
    ] {
        if let Err(err) = player.add_component(component, ctx) {
            error!("player setup: {err}");
        }
    }

    let world = ctx.game_objects.create("world");
    let mut streamer = World::new();
    streamer.set_loader(player.transform());
    if let Err(err) = world.add_component(Box::new(streamer), ctx) {
        error!("world setup: {err}");
    }
    engine.follow(player.transform());

    info!("simulating {tick_count} ticks, player spawned at {spawn:?}");
    for _ in 0..tick_count {
        engine.tick();
    }

    let summary = SimulationSummary {
        ticks: engine.ticks(),
        loaded_chunks: world
            .with_component::<World, _>(&ComponentKind::World, World::loaded_count)
            .unwrap_or(0),
        player_position: player.transform().world_position(),
        player_grounded: player
            .with_component::<Rigidbody, _>(&ComponentKind::Rigidbody, Rigidbody::is_grounded)
            .unwrap_or(false),
    };
    engine.shutdown();
    summary
}

/// Entry point of the `voxel-sim` binary.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();
    info!("Logger initialized");

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                error!("{err}");
                process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(ticks) = args.ticks {
        config.tick_count = ticks;
    }

    let stopwatch = web_time::Instant::now();
    let summary = simulate(config);
    info!(
        "{SIMULATION_STOPWATCH}: {} ticks in {:?}",
        summary.ticks,
        stopwatch.elapsed()
    );
    info!(
        "{} chunks loaded, player at {:?}, grounded: {}",
        summary.loaded_chunks, summary.player_position, summary.player_grounded
    );
}

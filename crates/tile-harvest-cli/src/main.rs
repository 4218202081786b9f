use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::Serialize;
use std::path::PathBuf;
use tile_harvest_core::events::SimEvent;
use tile_harvest_core::world::RunSummary;
use tile_harvest_core::{
    event_channel, AoeShape, Cell, GridGeometry, InteractionMode, SimConfig, TileLayer, World,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Aoe,
    Adjacency,
}

impl From<ModeArg> for InteractionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Aoe => InteractionMode::Aoe,
            ModeArg::Adjacency => InteractionMode::Adjacency,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeArg {
    Single,
    Cross,
    Square,
}

impl From<ShapeArg> for AoeShape {
    fn from(shape: ShapeArg) -> Self {
        match shape {
            ShapeArg::Single => AoeShape::SingleTile,
            ShapeArg::Cross => AoeShape::Cross,
            ShapeArg::Square => AoeShape::Square3x3,
        }
    }
}

/// Headless grass-field run with a scripted clicker. Prints a JSON summary.
#[derive(Parser, Debug)]
#[command(name = "tile-harvest", version)]
struct Args {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 8)]
    width: i32,
    #[arg(long, default_value_t = 8)]
    height: i32,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    max_count: Option<usize>,
    /// Seconds between spawn attempts.
    #[arg(long)]
    interval: Option<f64>,
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    #[arg(long, value_enum)]
    shape: Option<ShapeArg>,
    #[arg(long, default_value_t = 600)]
    steps: usize,
    /// Simulated seconds per step.
    #[arg(long, default_value_t = 0.1)]
    dt: f64,
    #[arg(long, default_value_t = 50)]
    sample_every: usize,
    /// Probability that the scripted player clicks after a step.
    #[arg(long, default_value_t = 0.2)]
    click_chance: f64,
}

#[derive(Debug, Default, Serialize)]
struct EventTally {
    spawned: usize,
    collected: u64,
    ripples: usize,
    moves: usize,
}

#[derive(Serialize)]
struct Output {
    summary: RunSummary,
    events: EventTally,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(max_count) = args.max_count {
        config.max_count = max_count;
    }
    if let Some(interval) = args.interval {
        config.spawn_interval_secs = interval;
    }
    if let Some(mode) = args.mode {
        config.interaction_mode = mode.into();
    }
    if let Some(shape) = args.shape {
        config.aoe_shape = shape.into();
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Picks a target the way a player would: grass when there is some, any
/// painted tile otherwise, and only neighbouring tiles in adjacency mode.
fn scripted_click(
    rng: &mut ChaCha12Rng,
    world: &World<TileLayer>,
    click_chance: f64,
) -> Option<Cell> {
    if !rng.random_bool(click_chance) {
        return None;
    }
    match world.interaction_mode() {
        InteractionMode::Adjacency => {
            let here = world.actor().cell();
            let dx = rng.random_range(-1..=1);
            let dy = rng.random_range(-1..=1);
            here.checked_offset(dx, dy)
        }
        InteractionMode::Aoe => {
            let mut grass: Vec<Cell> = world.registry().occupied_cells().collect();
            grass.sort_unstable();
            if !grass.is_empty() && rng.random_bool(0.5) {
                return Some(grass[rng.random_range(0..grass.len())]);
            }
            let painted = world.geometry().paintable_cells();
            if painted.is_empty() {
                return None;
            }
            Some(painted[rng.random_range(0..painted.len())])
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    if !(0.0..=1.0).contains(&args.click_chance) {
        bail!("--click-chance must be within [0, 1]");
    }
    let config = build_config(&args)?;

    let geometry = TileLayer::filled(config.tile_size, args.width, args.height)
        .context("building tile layer")?;
    let (events, receiver) = event_channel();
    let mut world = World::try_new(config.clone(), geometry, events)?;
    info!(
        width = args.width,
        height = args.height,
        steps = args.steps,
        "starting scripted run"
    );

    let mut rng = ChaCha12Rng::seed_from_u64(config.seed.wrapping_add(1));
    let click_chance = args.click_chance;
    let summary = world.run_script(args.steps, args.dt, args.sample_every, |w| {
        scripted_click(&mut rng, w, click_chance)
    })?;

    let mut tally = EventTally::default();
    for event in receiver.try_iter() {
        match event {
            SimEvent::Spawned { .. } => tally.spawned += 1,
            SimEvent::Collected { count, .. } => tally.collected += count,
            SimEvent::Ripple { .. } => tally.ripples += 1,
            SimEvent::ActorMoved { .. } => tally.moves += 1,
            _ => {}
        }
    }
    info!(
        balance = summary.stats.balance,
        collected = summary.stats.total_collected,
        "run finished"
    );

    let output = Output {
        summary,
        events: tally,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

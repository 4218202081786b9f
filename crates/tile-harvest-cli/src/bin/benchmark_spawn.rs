use std::time::Instant;
use tile_harvest_core::events::EventSender;
use tile_harvest_core::spawner::SpawnOutcome;
use tile_harvest_core::{SimConfig, TileLayer, World};

fn build_world(side: i32, max_count: usize) -> World<TileLayer> {
    let config = SimConfig {
        max_count,
        seed: 42,
        ..SimConfig::default()
    };
    let geometry = TileLayer::filled(config.tile_size, side, side)
        .unwrap_or_else(|e| panic!("{e}"));
    World::new(config, geometry, EventSender::detached())
}

fn fill(world: &mut World<TileLayer>, attempts: usize) -> usize {
    let mut spawned = 0;
    for _ in 0..attempts {
        match world.spawn_now() {
            SpawnOutcome::Spawned(_) => spawned += 1,
            _ => break,
        }
    }
    spawned
}

fn main() {
    let side = 120;
    let cells = (side * side) as usize;
    println!("Benchmarking spawn ticks on a {side}x{side} board ({cells} tiles)");

    // Sparse board: capacity far below the number of tiles.
    let mut sparse = build_world(side, 1_000);
    let start = Instant::now();
    let spawned = fill(&mut sparse, 1_000);
    let elapsed = start.elapsed();
    println!("Sparse: {spawned} spawns in {elapsed:?}");
    println!("Avg per spawn (sparse): {:?}", elapsed / spawned.max(1) as u32);

    // Dense board: fill every tile, the last spawns see almost no free cells.
    let mut dense = build_world(side, cells);
    let start = Instant::now();
    let spawned = fill(&mut dense, cells);
    let elapsed = start.elapsed();
    println!("Dense: {spawned} spawns in {elapsed:?}");
    println!("Avg per spawn (dense): {:?}", elapsed / spawned.max(1) as u32);

    let start = Instant::now();
    let outcome = dense.spawn_now();
    println!("Tick on a full board: {:?} ({outcome:?})", start.elapsed());
}

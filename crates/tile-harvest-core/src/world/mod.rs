pub mod lifecycle;
pub mod metrics;

pub use metrics::*;

use crate::actor::Actor;
use crate::aoe::AoeShape;
use crate::cell::Cell;
use crate::collector::{CollectionCoordinator, InteractionMode};
use crate::config::{SimConfig, SimConfigError};
use crate::events::EventSender;
use crate::geometry::GridGeometry;
use crate::registry::GridOccupancyRegistry;
use crate::schedule::{Scheduler, Task, TaskHandle};
use crate::score::{ScoreSink, Wallet};
use crate::spawner::ResourceSpawner;
use std::{error::Error, fmt};
use tracing::info;

/// One board: terrain, live resources, the player's piece and wallet, and the
/// timers that drive them. Spawn ticks and clicks both take `&mut self`, so
/// every registry read-modify-write runs to completion before the next one.
pub struct World<G: GridGeometry> {
    pub(crate) geometry: G,
    pub(crate) registry: GridOccupancyRegistry,
    pub(crate) spawner: ResourceSpawner,
    pub(crate) collector: CollectionCoordinator,
    pub(crate) actor: Actor,
    pub(crate) wallet: Wallet,
    pub(crate) scheduler: Scheduler,
    pub(crate) events: EventSender,
    pub(crate) config: SimConfig,
    pub(crate) spawn_timer: TaskHandle,
    /// Pending `CooldownElapsed`, if any. At most one is armed at a time.
    pub(crate) cooldown_timer: Option<TaskHandle>,
    pub(crate) ripples_in_flight: usize,
    pub(crate) total_spawned: u64,
    pub(crate) total_collected: u64,
    pub(crate) clicks_accepted: u64,
    pub(crate) clicks_rejected: u64,
    pub(crate) moves: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldInitError {
    Config(SimConfigError),
    ActorWithoutTerrain { cell: Cell },
}

impl fmt::Display for WorldInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldInitError::Config(e) => write!(f, "{}", e),
            WorldInitError::ActorWithoutTerrain { cell } => {
                write!(f, "adjacency actor starts on cell {cell} which has no terrain")
            }
        }
    }
}

impl From<SimConfigError> for WorldInitError {
    fn from(err: SimConfigError) -> Self {
        WorldInitError::Config(err)
    }
}

impl Error for WorldInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorldInitError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl<G: GridGeometry> World<G> {
    pub fn new(config: SimConfig, geometry: G, events: EventSender) -> Self {
        Self::try_new(config, geometry, events).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(
        config: SimConfig,
        geometry: G,
        events: EventSender,
    ) -> Result<Self, WorldInitError> {
        config.validate()?;
        let actor_start = Cell::new(config.actor_start[0], config.actor_start[1]);
        if config.interaction_mode == InteractionMode::Adjacency
            && !geometry.has_terrain(actor_start)
        {
            return Err(WorldInitError::ActorWithoutTerrain { cell: actor_start });
        }

        let mut scheduler = Scheduler::new();
        let spawn_timer = scheduler.on_interval(config.spawn_interval_secs, Task::SpawnTick);
        info!(
            max_count = config.max_count,
            interval = config.spawn_interval_secs,
            mode = ?config.interaction_mode,
            shape = ?config.aoe_shape,
            "world ready"
        );

        Ok(Self {
            registry: GridOccupancyRegistry::new(config.max_count),
            spawner: ResourceSpawner::new(
                config.max_count,
                config.spawn_interval_secs,
                config.seed,
            ),
            collector: CollectionCoordinator {
                mode: config.interaction_mode,
                shape: config.aoe_shape,
                ripple_delay_per_tile: config.ripple_delay_per_tile,
                ripple_total_duration: config.ripple_total_duration,
            },
            actor: Actor::new(actor_start),
            wallet: Wallet::new(config.starting_balance, events.clone()),
            scheduler,
            events,
            geometry,
            config,
            spawn_timer,
            cooldown_timer: None,
            ripples_in_flight: 0,
            total_spawned: 0,
            total_collected: 0,
            clicks_accepted: 0,
            clicks_rejected: 0,
            moves: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Terrain may be painted or erased between ticks. Resources already on
    /// erased cells stay until collected.
    pub fn geometry_mut(&mut self) -> &mut G {
        &mut self.geometry
    }

    pub fn registry(&self) -> &GridOccupancyRegistry {
        &self.registry
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn balance(&self) -> u64 {
        self.wallet.balance()
    }

    /// Spend flow for upgrades and the like.
    pub fn spend(&mut self, amount: u64) -> bool {
        self.wallet.debit(amount)
    }

    pub fn now(&self) -> f64 {
        self.scheduler.now()
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        self.collector.mode
    }

    pub fn set_interaction_mode(&mut self, mode: InteractionMode) {
        self.collector.mode = mode;
        self.config.interaction_mode = mode;
    }

    pub fn aoe_shape(&self) -> AoeShape {
        self.collector.shape
    }

    pub fn set_aoe_shape(&mut self, shape: AoeShape) {
        self.collector.shape = shape;
        self.config.aoe_shape = shape;
    }

    /// Stops the periodic spawner. Ticks already due are dropped.
    pub fn pause_spawning(&mut self) {
        self.scheduler.cancel(self.spawn_timer);
    }

    pub fn resume_spawning(&mut self) {
        if !self.scheduler.is_pending(Task::SpawnTick) {
            self.spawn_timer = self
                .scheduler
                .on_interval(self.spawner.spawn_interval(), Task::SpawnTick);
        }
    }

    pub fn hover_active(&self) -> bool {
        self.ripples_in_flight == 0
    }
}

pub mod actor;
pub mod aoe;
pub mod cell;
pub mod collector;
pub mod config;
pub mod events;
pub mod geometry;
pub mod registry;
pub mod resource;
pub mod schedule;
pub mod score;
pub mod spawner;
pub mod world;

pub use aoe::{footprint, AoeShape};
pub use cell::Cell;
pub use collector::{ClickOutcome, InteractionMode};
pub use config::SimConfig;
pub use events::{event_channel, SimEvent};
pub use geometry::{GridGeometry, TileLayer};
pub use registry::{GridOccupancyRegistry, SharedRegistry};
pub use world::World;

use crate::actor::Actor;
use crate::aoe::{footprint, AoeShape, RipplePlan};
use crate::cell::Cell;
use crate::events::{EventSender, SimEvent};
use crate::geometry::GridGeometry;
use crate::registry::GridOccupancyRegistry;
use crate::resource::ResourceInstance;
use crate::score::ScoreSink;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// How a click on the board is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    /// Collect everything under the footprint centred on the clicked cell.
    #[default]
    Aoe,
    /// Collect one cell next to the actor, or hop onto it when it is empty.
    Adjacency,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The clicked cell has no terrain.
    NoTerrain,
    /// The actor is moving or cooling down; the click is dropped, not queued.
    Busy,
    /// Not exactly one step (Chebyshev) from the actor.
    NotAdjacent,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Collection {
    pub target: Cell,
    /// Intended footprint, including bare and empty cells.
    pub footprint: Vec<Cell>,
    /// Instances removed from the registry, already destroyed.
    pub collected: Vec<ResourceInstance>,
    pub ripple: Option<RipplePlan>,
}

impl Collection {
    pub fn count(&self) -> u64 {
        self.collected.len() as u64
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    Rejected(RejectReason),
    Collected(Collection),
    MoveStarted { from: Cell, to: Cell },
}

impl ClickOutcome {
    pub fn collected_count(&self) -> u64 {
        match self {
            ClickOutcome::Collected(c) => c.count(),
            _ => 0,
        }
    }
}

/// Everything a click may read or write, borrowed for the duration of one
/// click so the whole lookup-then-remove sequence is uninterrupted.
pub struct ClickContext<'a, G: GridGeometry + ?Sized> {
    pub geometry: &'a G,
    pub registry: &'a mut GridOccupancyRegistry,
    pub score: &'a mut dyn ScoreSink,
    pub actor: &'a mut Actor,
    pub events: &'a EventSender,
}

#[derive(Clone, Debug)]
pub struct CollectionCoordinator {
    pub mode: InteractionMode,
    pub shape: AoeShape,
    pub ripple_delay_per_tile: f64,
    pub ripple_total_duration: f64,
}

impl Default for CollectionCoordinator {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Aoe,
            shape: AoeShape::Cross,
            ripple_delay_per_tile: 0.08,
            ripple_total_duration: 0.5,
        }
    }
}

impl CollectionCoordinator {
    pub fn click_world<G: GridGeometry + ?Sized>(
        &self,
        position: [f64; 2],
        ctx: ClickContext<'_, G>,
    ) -> ClickOutcome {
        let cell = ctx.geometry.cell_of(position);
        self.click_cell(cell, ctx)
    }

    pub fn click_cell<G: GridGeometry + ?Sized>(
        &self,
        target: Cell,
        ctx: ClickContext<'_, G>,
    ) -> ClickOutcome {
        match self.mode {
            InteractionMode::Aoe => self.collect_aoe(target, ctx),
            InteractionMode::Adjacency => self.click_adjacent(target, ctx),
        }
    }

    fn collect_aoe<G: GridGeometry + ?Sized>(
        &self,
        target: Cell,
        ctx: ClickContext<'_, G>,
    ) -> ClickOutcome {
        if !ctx.geometry.has_terrain(target) {
            debug!(cell = %target, "click ignored: no terrain");
            return ClickOutcome::Rejected(RejectReason::NoTerrain);
        }

        let cells = footprint(target, self.shape);
        let collected: Vec<ResourceInstance> = cells
            .iter()
            .copied()
            .filter(|&c| ctx.geometry.has_terrain(c))
            .filter_map(|c| ctx.registry.remove(c))
            .collect();
        let collected = Self::settle(collected, ctx.score, ctx.events);

        let ripple = RipplePlan::new(
            target,
            &cells,
            |c| ctx.geometry.has_terrain(c),
            self.ripple_delay_per_tile,
            self.ripple_total_duration,
        );
        ctx.events.send(SimEvent::HoverActive(false));
        ctx.events.send(SimEvent::Ripple {
            center: ripple.center,
            cells: ripple.cells.clone(),
            duration: ripple.duration,
        });

        ClickOutcome::Collected(Collection {
            target,
            footprint: cells,
            collected,
            ripple: Some(ripple),
        })
    }

    fn click_adjacent<G: GridGeometry + ?Sized>(
        &self,
        target: Cell,
        ctx: ClickContext<'_, G>,
    ) -> ClickOutcome {
        if !ctx.actor.is_ready() {
            debug!(cell = %target, "click ignored: actor busy");
            return ClickOutcome::Rejected(RejectReason::Busy);
        }
        if !ctx.geometry.has_terrain(target) {
            debug!(cell = %target, "click ignored: no terrain");
            return ClickOutcome::Rejected(RejectReason::NoTerrain);
        }
        if !ctx.actor.cell().is_adjacent(target) {
            debug!(
                cell = %target,
                actor = %ctx.actor.cell(),
                "click ignored: not adjacent"
            );
            return ClickOutcome::Rejected(RejectReason::NotAdjacent);
        }

        match ctx.registry.remove(target) {
            Some(instance) => {
                let collected = Self::settle(vec![instance], ctx.score, ctx.events);
                ctx.actor.start_cooldown();
                ClickOutcome::Collected(Collection {
                    target,
                    footprint: vec![target],
                    collected,
                    ripple: None,
                })
            }
            None => {
                let from = ctx.actor.begin_move(target);
                ctx.actor.start_cooldown();
                ClickOutcome::MoveStarted { from, to: target }
            }
        }
    }

    /// Destroys removed instances and credits them in one call.
    fn settle(
        mut collected: Vec<ResourceInstance>,
        score: &mut dyn ScoreSink,
        events: &EventSender,
    ) -> Vec<ResourceInstance> {
        if collected.is_empty() {
            return collected;
        }
        for instance in &mut collected {
            instance.destroy();
        }
        let count = collected.len() as u64;
        events.send(SimEvent::Collected {
            cells: collected.iter().map(|g| g.cell).collect(),
            ids: collected.iter().map(|g| g.id).collect(),
            count,
        });
        score.credit(count);
        info!(count, balance = score.balance(), "collected resources");
        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{event_channel, EventReceiver};
    use crate::geometry::TileLayer;
    use crate::resource::ResourceId;
    use crate::score::Wallet;

    struct Board {
        geo: TileLayer,
        reg: GridOccupancyRegistry,
        wallet: Wallet,
        actor: Actor,
        tx: EventSender,
        rx: EventReceiver,
    }

    impl Board {
        fn new(painted: &[(i32, i32)]) -> Self {
            let mut geo = TileLayer::new([16.0, 16.0], [0.0, 0.0]).unwrap();
            for &c in painted {
                geo.paint(c.into());
            }
            let (tx, rx) = event_channel();
            Self {
                geo,
                reg: GridOccupancyRegistry::new(100),
                wallet: Wallet::new(0, tx.clone()),
                actor: Actor::new(Cell::ZERO),
                tx,
                rx,
            }
        }

        fn grow(&mut self, cells: &[(i32, i32)]) {
            for &c in cells {
                let cell = Cell::from(c);
                let id = ResourceId(self.reg.len() as u64);
                let instance = ResourceInstance::new(id, cell, self.geo.world_position_of(cell));
                self.reg.insert(cell, instance).unwrap();
            }
        }

        fn click(
            &mut self,
            coordinator: &CollectionCoordinator,
            target: (i32, i32),
        ) -> ClickOutcome {
            coordinator.click_cell(
                target.into(),
                ClickContext {
                    geometry: &self.geo,
                    registry: &mut self.reg,
                    score: &mut self.wallet,
                    actor: &mut self.actor,
                    events: &self.tx,
                },
            )
        }
    }

    fn aoe(shape: AoeShape) -> CollectionCoordinator {
        CollectionCoordinator {
            shape,
            ..CollectionCoordinator::default()
        }
    }

    fn adjacency() -> CollectionCoordinator {
        CollectionCoordinator {
            mode: InteractionMode::Adjacency,
            ..CollectionCoordinator::default()
        }
    }

    #[test]
    fn cross_collects_only_occupied_center() {
        let mut board = Board::new(&[(0, 0), (1, 0), (0, 1)]);
        board.grow(&[(0, 0)]);
        let outcome = board.click(&aoe(AoeShape::Cross), (0, 0));
        assert_eq!(outcome.collected_count(), 1);
        assert!(board.reg.is_empty());
        assert_eq!(board.wallet.balance(), 1);
        let ClickOutcome::Collected(c) = outcome else {
            panic!("expected a collection");
        };
        assert_eq!(c.footprint.len(), 5);
        assert!(c.collected.iter().all(|g| !g.is_alive()));
    }

    #[test]
    fn partial_footprint_removes_exactly_the_occupied_cells() {
        let mut board = Board::new(&[(0, 0), (1, 0), (2, 0), (1, 1), (1, -1), (0, 1)]);
        board.grow(&[(1, 0), (2, 0), (1, -1), (0, 1)]);
        let outcome = board.click(&aoe(AoeShape::Cross), (1, 0));
        assert_eq!(outcome.collected_count(), 3);
        assert_eq!(board.wallet.balance(), 3);
        assert_eq!(board.reg.len(), 1);
        assert!(board.reg.contains(Cell::new(0, 1)));
    }

    #[test]
    fn second_identical_collection_credits_nothing() {
        let mut board = Board::new(&[(0, 0), (1, 0), (1, 1), (0, 1)]);
        board.grow(&[(0, 0), (1, 1)]);
        let coordinator = aoe(AoeShape::Square3x3);
        assert_eq!(board.click(&coordinator, (0, 0)).collected_count(), 2);
        assert_eq!(board.click(&coordinator, (0, 0)).collected_count(), 0);
        assert_eq!(board.wallet.balance(), 2);
    }

    #[test]
    fn bare_footprint_cells_are_not_collected() {
        let mut board = Board::new(&[(0, 0)]);
        // Occupied but unpainted; only reachable through direct inserts.
        board.grow(&[(0, 0), (1, 0)]);
        let outcome = board.click(&aoe(AoeShape::Cross), (0, 0));
        assert_eq!(outcome.collected_count(), 1);
        assert!(board.reg.contains(Cell::new(1, 0)));
    }

    #[test]
    fn click_on_bare_ground_is_rejected() {
        let mut board = Board::new(&[(0, 0)]);
        board.grow(&[(0, 0)]);
        assert_eq!(
            board.click(&aoe(AoeShape::Square3x3), (1, 0)),
            ClickOutcome::Rejected(RejectReason::NoTerrain)
        );
        assert_eq!(board.reg.len(), 1);
        assert!(board.rx.drain().is_empty());
    }

    #[test]
    fn events_report_single_credit_and_full_ripple() {
        let mut board = Board::new(&[(0, 0), (1, 0), (0, 1)]);
        board.grow(&[(0, 0), (1, 0)]);
        board.click(&aoe(AoeShape::Cross), (0, 0));
        let events = board.rx.drain();
        let credits: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, SimEvent::ScoreChanged { .. }))
            .collect();
        assert_eq!(credits, vec![&SimEvent::ScoreChanged { total: 2 }]);
        assert!(events.contains(&SimEvent::HoverActive(false)));
        let ripple = events
            .iter()
            .find_map(|e| match e {
                SimEvent::Ripple { cells, .. } => Some(cells.len()),
                _ => None,
            })
            .expect("ripple event");
        assert_eq!(ripple, 3, "ripple covers painted footprint cells");
    }

    #[test]
    fn empty_footprint_still_ripples_but_does_not_credit() {
        let mut board = Board::new(&[(0, 0)]);
        let outcome = board.click(&aoe(AoeShape::Cross), (0, 0));
        assert!(matches!(outcome, ClickOutcome::Collected(ref c) if c.collected.is_empty()));
        let events = board.rx.drain();
        assert!(!events.iter().any(|e| matches!(e, SimEvent::Collected { .. })));
        assert!(events.iter().any(|e| matches!(e, SimEvent::Ripple { .. })));
        assert_eq!(board.wallet.balance(), 0);
    }

    #[test]
    fn adjacency_rejects_distance_two_without_state_change() {
        let mut board = Board::new(&[(0, 0), (1, 0), (2, 0)]);
        board.grow(&[(2, 0)]);
        let before = board.actor.clone();
        assert_eq!(
            board.click(&adjacency(), (2, 0)),
            ClickOutcome::Rejected(RejectReason::NotAdjacent)
        );
        assert_eq!(board.actor, before);
        assert!(board.reg.contains(Cell::new(2, 0)));
        assert_eq!(board.wallet.balance(), 0);
    }

    #[test]
    fn adjacency_rejects_own_cell() {
        let mut board = Board::new(&[(0, 0)]);
        board.grow(&[(0, 0)]);
        assert_eq!(
            board.click(&adjacency(), (0, 0)),
            ClickOutcome::Rejected(RejectReason::NotAdjacent)
        );
    }

    #[test]
    fn adjacency_collects_occupied_neighbour() {
        let mut board = Board::new(&[(0, 0), (1, 1)]);
        board.grow(&[(1, 1)]);
        let outcome = board.click(&adjacency(), (1, 1));
        assert_eq!(outcome.collected_count(), 1);
        assert_eq!(board.actor.cell(), Cell::ZERO, "collecting does not move");
        assert!(board.actor.is_cooling_down());
        assert_eq!(board.wallet.balance(), 1);
    }

    #[test]
    fn adjacency_moves_onto_empty_neighbour_then_ignores_clicks() {
        let mut board = Board::new(&[(0, 0), (1, 0), (2, 0)]);
        board.grow(&[(2, 0)]);
        assert_eq!(
            board.click(&adjacency(), (1, 0)),
            ClickOutcome::MoveStarted {
                from: Cell::ZERO,
                to: Cell::new(1, 0)
            }
        );
        assert_eq!(
            board.click(&adjacency(), (2, 0)),
            ClickOutcome::Rejected(RejectReason::Busy)
        );
        assert!(board.reg.contains(Cell::new(2, 0)));
    }

    #[test]
    fn adjacency_requires_terrain() {
        let mut board = Board::new(&[(0, 0)]);
        assert_eq!(
            board.click(&adjacency(), (1, 0)),
            ClickOutcome::Rejected(RejectReason::NoTerrain)
        );
        assert!(board.actor.is_ready());
    }

    #[test]
    fn click_world_resolves_cell_through_geometry() {
        let mut board = Board::new(&[(2, 3)]);
        board.grow(&[(2, 3)]);
        let coordinator = aoe(AoeShape::SingleTile);
        let outcome = coordinator.click_world(
            [2.0 * 16.0 + 1.0, 3.0 * 16.0 + 15.0],
            ClickContext {
                geometry: &board.geo,
                registry: &mut board.reg,
                score: &mut board.wallet,
                actor: &mut board.actor,
                events: &board.tx,
            },
        );
        assert_eq!(outcome.collected_count(), 1);
    }
}

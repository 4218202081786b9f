use crate::cell::Cell;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorState {
    #[default]
    Idle,
    /// Hopping to an adjacent cell; clicks are ignored until it lands.
    Moving { from: Cell, to: Cell },
}

/// The player piece used by adjacency interaction. Collecting is instantaneous
/// so it never shows up as a state of its own.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    cell: Cell,
    state: ActorState,
    cooling_down: bool,
}

impl Actor {
    pub fn new(cell: Cell) -> Self {
        Self {
            cell,
            state: ActorState::Idle,
            cooling_down: false,
        }
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    pub fn state(&self) -> ActorState {
        self.state
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooling_down
    }

    /// Idle and past the cooldown.
    pub fn is_ready(&self) -> bool {
        self.state == ActorState::Idle && !self.cooling_down
    }

    pub fn start_cooldown(&mut self) {
        self.cooling_down = true;
    }

    pub fn cooldown_elapsed(&mut self) {
        self.cooling_down = false;
    }

    /// The actor occupies `to` from the start of the hop.
    pub fn begin_move(&mut self, to: Cell) -> Cell {
        debug_assert!(self.is_ready(), "move started while busy");
        let from = self.cell;
        self.cell = to;
        self.state = ActorState::Moving { from, to };
        from
    }

    /// Returns the landing cell, or `None` if no hop was in flight.
    pub fn finish_move(&mut self) -> Option<Cell> {
        match self.state {
            ActorState::Moving { to, .. } => {
                self.state = ActorState::Idle;
                Some(to)
            }
            ActorState::Idle => None,
        }
    }
}

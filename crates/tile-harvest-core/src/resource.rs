use crate::cell::Cell;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub u64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One spawned collectible ("grass").
/// The cell recorded here is informational; the registry key is authoritative.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceInstance {
    pub id: ResourceId,
    pub cell: Cell,
    pub position: [f64; 2],
    alive: bool,
}

impl ResourceInstance {
    pub fn new(id: ResourceId, cell: Cell, position: [f64; 2]) -> Self {
        Self {
            id,
            cell,
            position,
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Marks the instance collected. Idempotent.
    pub fn destroy(&mut self) {
        self.alive = false;
    }
}

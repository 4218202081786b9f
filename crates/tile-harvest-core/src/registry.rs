use crate::cell::Cell;
use crate::resource::ResourceInstance;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::{error::Error, fmt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    AlreadyOccupied { cell: Cell },
    AtCapacity { capacity: usize },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::AlreadyOccupied { cell } => write!(f, "cell {cell} is already occupied"),
            RegistryError::AtCapacity { capacity } => {
                write!(f, "registry is at capacity ({capacity})")
            }
        }
    }
}

impl Error for RegistryError {}

/// Authoritative cell -> resource mapping.
///
/// A cell is a key iff a live, uncollected resource occupies it, and the
/// number of keys never exceeds `capacity`. `insert` and `remove` are the only
/// mutators.
#[derive(Debug)]
pub struct GridOccupancyRegistry {
    cells: HashMap<Cell, ResourceInstance>,
    capacity: usize,
}

impl GridOccupancyRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            cells: HashMap::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    pub fn try_get(&self, cell: Cell) -> Option<&ResourceInstance> {
        self.cells.get(&cell)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains_key(&cell)
    }

    pub fn insert(&mut self, cell: Cell, instance: ResourceInstance) -> Result<(), RegistryError> {
        debug_assert!(instance.is_alive(), "only live instances may be registered");
        if self.cells.contains_key(&cell) {
            return Err(RegistryError::AlreadyOccupied { cell });
        }
        if self.cells.len() >= self.capacity {
            return Err(RegistryError::AtCapacity {
                capacity: self.capacity,
            });
        }
        self.cells.insert(cell, instance);
        self.debug_check_invariants();
        Ok(())
    }

    /// Removes and returns the occupant. An empty cell is a normal no-op.
    pub fn remove(&mut self, cell: Cell) -> Option<ResourceInstance> {
        self.cells.remove(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.cells.len() >= self.capacity
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.keys().copied()
    }

    pub fn instances(&self) -> impl Iterator<Item = &ResourceInstance> + '_ {
        self.cells.values()
    }

    fn debug_check_invariants(&self) {
        debug_assert!(
            self.cells.len() <= self.capacity,
            "registry size {} exceeds capacity {}",
            self.cells.len(),
            self.capacity
        );
        debug_assert!(
            self.cells.values().all(ResourceInstance::is_alive),
            "registry holds a destroyed instance"
        );
    }
}

/// Registry behind a lock, for hosts whose spawn timer and input handler run
/// on different threads. Hold the lock for a whole check-then-mutate sequence.
#[derive(Clone, Debug)]
pub struct SharedRegistry(Arc<Mutex<GridOccupancyRegistry>>);

impl SharedRegistry {
    pub fn new(registry: GridOccupancyRegistry) -> Self {
        Self(Arc::new(Mutex::new(registry)))
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut GridOccupancyRegistry) -> R) -> R {
        let mut guard = self.0.lock();
        f(&mut guard)
    }

    pub fn len(&self) -> usize {
        self.0.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}

use crate::cell::Cell;
use crate::resource::ResourceId;
use crossbeam_channel::{unbounded, Receiver, Sender, TryIter};
use serde::{Deserialize, Serialize};

/// Notifications from the simulation to presentation and scoring listeners.
/// Fire-and-forget: the simulation never waits for a reaction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    Spawned {
        id: ResourceId,
        cell: Cell,
        position: [f64; 2],
    },
    Collected {
        cells: Vec<Cell>,
        ids: Vec<ResourceId>,
        count: u64,
    },
    ScoreChanged {
        total: u64,
    },
    /// Ripple over the intended footprint, empty cells included.
    Ripple {
        center: Cell,
        cells: Vec<(Cell, f64)>,
        duration: f64,
    },
    HoverActive(bool),
    ActorMoved {
        from: Cell,
        to: Cell,
        duration: f64,
    },
    ActorIdle {
        cell: Cell,
    },
}

/// Sending half. Unbounded, so `send` never blocks; a dropped receiver just
/// discards events.
#[derive(Clone, Debug)]
pub struct EventSender(Sender<SimEvent>);

impl EventSender {
    pub fn send(&self, event: SimEvent) {
        let _ = self.0.send(event);
    }

    /// Sender whose receiver is already gone. Useful when nobody listens.
    pub fn detached() -> Self {
        let (tx, _) = unbounded();
        Self(tx)
    }
}

#[derive(Debug)]
pub struct EventReceiver(Receiver<SimEvent>);

impl EventReceiver {
    pub fn try_iter(&self) -> TryIter<'_, SimEvent> {
        self.0.try_iter()
    }

    pub fn drain(&self) -> Vec<SimEvent> {
        self.0.try_iter().collect()
    }
}

pub fn event_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = unbounded();
    (EventSender(tx), EventReceiver(rx))
}

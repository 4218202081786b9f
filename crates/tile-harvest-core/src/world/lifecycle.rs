use super::World;
use crate::cell::Cell;
use crate::collector::{ClickContext, ClickOutcome, InteractionMode};
use crate::events::SimEvent;
use crate::geometry::GridGeometry;
use crate::schedule::Task;
use crate::spawner::SpawnOutcome;
use tracing::debug;

impl<G: GridGeometry> World<G> {
    /// Runs every timer that comes due within the next `dt` seconds, in
    /// deadline order, and returns the number of resources spawned.
    pub fn advance(&mut self, dt: f64) -> usize {
        let until = self.scheduler.now() + dt.max(0.0);
        let mut spawned = 0;
        while let Some((at, task)) = self.scheduler.pop_due(until) {
            debug!(at, ?task, "timer fired");
            if self.run_task(task) {
                spawned += 1;
            }
        }
        self.scheduler.settle(until);
        spawned
    }

    /// One spawn attempt outside the timer, e.g. to seed a fresh board.
    pub fn spawn_now(&mut self) -> SpawnOutcome {
        let outcome = self
            .spawner
            .on_spawn_tick(&self.geometry, &mut self.registry);
        if let SpawnOutcome::Spawned(instance) = &outcome {
            self.total_spawned += 1;
            self.events.send(SimEvent::Spawned {
                id: instance.id,
                cell: instance.cell,
                position: instance.position,
            });
        }
        outcome
    }

    fn run_task(&mut self, task: Task) -> bool {
        match task {
            Task::SpawnTick => return self.spawn_now().spawned().is_some(),
            Task::MoveFinished => {
                if let Some(cell) = self.actor.finish_move() {
                    self.events.send(SimEvent::ActorIdle { cell });
                }
            }
            Task::CooldownElapsed => {
                self.cooldown_timer = None;
                self.actor.cooldown_elapsed();
            }
            Task::RippleFinished => {
                self.ripples_in_flight = self.ripples_in_flight.saturating_sub(1);
                if self.ripples_in_flight == 0 {
                    self.events.send(SimEvent::HoverActive(true));
                }
            }
        }
        false
    }

    pub fn click_world(&mut self, position: [f64; 2]) -> ClickOutcome {
        let cell = self.geometry.cell_of(position);
        self.click_cell(cell)
    }

    pub fn click_cell(&mut self, target: Cell) -> ClickOutcome {
        let outcome = self.collector.click_cell(
            target,
            ClickContext {
                geometry: &self.geometry,
                registry: &mut self.registry,
                score: &mut self.wallet,
                actor: &mut self.actor,
                events: &self.events,
            },
        );
        self.schedule_follow_ups(&outcome);
        outcome
    }

    fn schedule_follow_ups(&mut self, outcome: &ClickOutcome) {
        match outcome {
            ClickOutcome::Rejected(_) => self.clicks_rejected += 1,
            ClickOutcome::Collected(collection) => {
                self.clicks_accepted += 1;
                self.total_collected += collection.count();
                if let Some(ripple) = &collection.ripple {
                    self.ripples_in_flight += 1;
                    self.scheduler.on_timeout(ripple.duration, Task::RippleFinished);
                }
                if self.collector.mode == InteractionMode::Adjacency {
                    self.arm_cooldown();
                }
            }
            ClickOutcome::MoveStarted { from, to } => {
                self.clicks_accepted += 1;
                self.moves += 1;
                self.events.send(SimEvent::ActorMoved {
                    from: *from,
                    to: *to,
                    duration: self.config.move_duration_secs,
                });
                self.scheduler
                    .on_timeout(self.config.move_duration_secs, Task::MoveFinished);
                self.arm_cooldown();
            }
        }
        debug_assert!(
            self.registry.len() <= self.spawner.max_count(),
            "registry above capacity after click"
        );
    }

    /// Replaces any pending cooldown so an older timer cannot end the new one.
    fn arm_cooldown(&mut self) {
        if let Some(stale) = self.cooldown_timer.take() {
            self.scheduler.cancel(stale);
        }
        self.cooldown_timer = Some(
            self.scheduler
                .on_timeout(self.config.move_cooldown_secs, Task::CooldownElapsed),
        );
    }
}

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Deferred work the world knows how to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Task {
    SpawnTick,
    MoveFinished,
    CooldownElapsed,
    RippleFinished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

#[derive(Debug)]
struct Pending {
    deadline: f64,
    seq: u64,
    task: Task,
    repeat: Option<f64>,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so the max-heap pops the earliest deadline, FIFO on ties.
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .total_cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Simulated clock with a queue of timeouts and intervals.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: f64,
    next_seq: u64,
    queue: BinaryHeap<Pending>,
    cancelled: Vec<u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Fires `task` every `period` seconds, first after one period.
    pub fn on_interval(&mut self, period: f64, task: Task) -> TaskHandle {
        debug_assert!(period > 0.0, "interval period must be positive");
        self.push(self.now + period, task, Some(period))
    }

    /// Fires `task` once after `delay` seconds.
    pub fn on_timeout(&mut self, delay: f64, task: Task) -> TaskHandle {
        self.push(self.now + delay.max(0.0), task, None)
    }

    pub fn cancel(&mut self, handle: TaskHandle) {
        if !self.cancelled.contains(&handle.0) && self.queue.iter().any(|p| p.seq == handle.0) {
            self.cancelled.push(handle.0);
        }
    }

    pub fn is_pending(&self, task: Task) -> bool {
        self.queue
            .iter()
            .any(|p| p.task == task && !self.cancelled.contains(&p.seq))
    }

    pub fn pending_len(&self) -> usize {
        self.queue.len() - self.cancelled.len()
    }

    /// Moves the clock forward by `dt` and returns every task that came due,
    /// in deadline order. Intervals that come due several times within one
    /// advance are returned once per period.
    pub fn advance(&mut self, dt: f64) -> Vec<(f64, Task)> {
        let until = self.now + dt.max(0.0);
        let mut due = Vec::new();
        while let Some(fired) = self.pop_due(until) {
            due.push(fired);
        }
        self.settle(until);
        due
    }

    /// Pops the earliest task due at or before `until` and moves the clock to
    /// its deadline, so work scheduled while handling it is timed from there.
    pub fn pop_due(&mut self, until: f64) -> Option<(f64, Task)> {
        loop {
            if self.queue.peek()?.deadline > until {
                return None;
            }
            let pending = self.queue.pop()?;
            if let Some(pos) = self.cancelled.iter().position(|&s| s == pending.seq) {
                self.cancelled.swap_remove(pos);
                continue;
            }
            self.now = self.now.max(pending.deadline);
            let fired = (pending.deadline, pending.task);
            if let Some(period) = pending.repeat {
                self.queue.push(Pending {
                    deadline: pending.deadline + period,
                    ..pending
                });
            }
            return Some(fired);
        }
    }

    /// Moves the clock to `until` once every due task has been handled.
    pub fn settle(&mut self, until: f64) {
        self.now = self.now.max(until);
    }

    fn push(&mut self, deadline: f64, task: Task, repeat: Option<f64>) -> TaskHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Pending {
            deadline,
            seq,
            task,
            repeat,
        });
        TaskHandle(seq)
    }
}

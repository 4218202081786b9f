use crate::events::{EventSender, SimEvent};

/// Destination for collected amounts.
pub trait ScoreSink {
    fn credit(&mut self, amount: u64);

    /// Spends `amount` if the balance covers it.
    fn debit(&mut self, amount: u64) -> bool;

    fn balance(&self) -> u64;
}

/// Player currency. Every change is announced as `ScoreChanged`.
#[derive(Debug)]
pub struct Wallet {
    balance: u64,
    events: EventSender,
}

impl Wallet {
    pub fn new(starting_balance: u64, events: EventSender) -> Self {
        Self {
            balance: starting_balance,
            events,
        }
    }
}

impl ScoreSink for Wallet {
    fn credit(&mut self, amount: u64) {
        if amount == 0 {
            return;
        }
        self.balance = self.balance.saturating_add(amount);
        self.events.send(SimEvent::ScoreChanged {
            total: self.balance,
        });
    }

    fn debit(&mut self, amount: u64) -> bool {
        if self.balance < amount {
            return false;
        }
        if amount > 0 {
            self.balance -= amount;
            self.events.send(SimEvent::ScoreChanged {
                total: self.balance,
            });
        }
        true
    }

    fn balance(&self) -> u64 {
        self.balance
    }
}

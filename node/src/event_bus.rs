//! Component events fanned out to subscribers.

use civic_governance::GovernanceEvent;
use civic_ledger::LedgerEvent;
use civic_timelock::TimelockEvent;
use serde::Serialize;

/// Any event emitted by one of the composed engines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SystemEvent {
    Ledger(LedgerEvent),
    Timelock(TimelockEvent),
    Governance(GovernanceEvent),
}

/// Synchronous fan-out event bus.
///
/// Listeners are invoked inline on the emitting thread; keep handlers fast.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&SystemEvent) + Send + Sync>>,
    emitted: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            emitted: 0,
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&SystemEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&mut self, event: &SystemEvent) {
        self.emitted += 1;
        for listener in &self.listeners {
            listener(event);
        }
    }

    /// Events emitted since the bus was created.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

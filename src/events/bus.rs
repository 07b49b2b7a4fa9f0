//! Event Bus - hands domain events from the shot session to whoever listens
//!
//! The session emits into its bus while it ticks; presentation, persistence and
//! the scenario runner drain it afterwards. Events are stamped with the tick
//! they were emitted on.

use super::types::GameEvent;

/// Tick-stamped event for the event bus
#[derive(Debug, Clone, PartialEq)]
pub struct BusEvent {
    /// Simulation tick the event was emitted on
    pub tick: u64,
    /// The event data
    pub event: GameEvent,
}

/// Queue of session events waiting to be consumed
#[derive(Debug)]
pub struct EventBus {
    /// Events emitted since the last drain
    pending: Vec<BusEvent>,

    /// Current tick (for stamping)
    tick: u64,

    /// Whether the bus is enabled (bulk simulation turns it off)
    enabled: bool,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    /// Create a new enabled event bus
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            tick: 0,
            enabled: true,
        }
    }

    pub fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    /// Emit an event to the bus
    pub fn emit(&mut self, event: GameEvent) {
        if !self.enabled {
            return;
        }
        self.pending.push(BusEvent {
            tick: self.tick,
            event,
        });
    }

    /// Take every pending event
    pub fn drain(&mut self) -> Vec<BusEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

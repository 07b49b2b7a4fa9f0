//! Shot session events
//!
//! The session emits domain events into an EventBus; the game, the recorders and
//! the scenario runner drain and react to them. Events can be written as compact
//! text lines for logs.

mod bus;
mod format;
mod types;

pub use bus::{BusEvent, EventBus};
pub use format::{parse_event, serialize_event};
pub use types::GameEvent;

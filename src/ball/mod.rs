//! Ball module - state, integration, and collision resolution

mod collision;
mod components;
mod physics;

pub use collision::*;
pub use components::*;
pub use physics::*;

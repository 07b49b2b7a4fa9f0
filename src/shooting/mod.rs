//! Shooting module - launch solver, aiming preview, and shot power

mod power;
mod trajectory;

pub use power::*;
pub use trajectory::*;

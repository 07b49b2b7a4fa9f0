//! UI module - HUD, shot feedback, rim glow and the aiming preview

mod animations;
mod feedback;
mod hud;
mod preview;

pub use animations::*;
pub use feedback::*;
pub use hud::*;
pub use preview::*;

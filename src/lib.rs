//! Hoopshot - a 3D basketball shooting game built with Bevy
//!
//! The shot physics (launch solver, integrator, collisions, score detection and
//! the possession state machine) are plain structs and functions that run
//! headless. The Bevy modules around them render the court and feed input.

// Core modules
pub mod config_watcher;
pub mod constants;
pub mod events;
pub mod history;
pub mod records;
pub mod simulation;
pub mod testing;
pub mod tuning;

// Game logic modules
pub mod ball;
pub mod input;
pub mod scoring;
pub mod session;
pub mod shooting;
pub mod ui;
pub mod world;

// Re-export commonly used types for convenience
pub use ball::{Ball, BallState, CollisionReport, GroundContact, Surface};
pub use config_watcher::ConfigWatcher;
pub use constants::*;
pub use events::{BusEvent, EventBus, GameEvent};
pub use history::{HistoryRecorder, SessionSummary, ShotHistory, ShotRow};
pub use input::ShotInputQueue;
pub use records::{CurrentRecords, Records, save_records_system};
pub use scoring::ScoreState;
pub use session::{ActiveSession, SessionEvents, ShotInput, ShotPhase, ShotSession};
pub use shooting::{LaunchSolution, ShotPower, preview_trajectory, solve_launch};
pub use tuning::PhysicsTweaks;
pub use ui::{FeedbackText, HudText, RimGlow, ShotFeedback};
pub use world::{CourtBounds, CourtGeometry, Hoop, RimMarker, RimTarget, Side};

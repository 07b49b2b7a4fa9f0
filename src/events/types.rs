//! Event type definitions for the shot session

use bevy::prelude::*;

use crate::world::Side;

/// Everything the shot session reports to the outside world
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    // === Session Events ===
    /// Session started (generated once per game launch)
    SessionStart {
        session_id: String, // UUID v4
        timestamp: String,  // RFC 3339
    },

    // === Shot Events ===
    /// Ball launched toward the rim on `side`
    ShotAttempted {
        side: Side,
        power: u8,
        speed: f32,
        /// Launch elevation in radians
        angle: f32,
        feasible: bool,
        origin: Vec3,
    },
    /// Ball dropped through a rim. Fires at most once per flight.
    ShotScored { side: Side, score: u32 },
    /// Possession over. Fires exactly once per flight.
    ShotResolved { made: bool },

    // === Record Events ===
    StreakChanged { current: u32, best: u32 },
    /// New all-time high score
    HighScoreChanged { value: u32 },

    // === Ball Events ===
    BallAtRest { position: Vec3 },
    /// Ball returned to center court by the player
    BallReset,
}

impl GameEvent {
    /// Get the event type code for compact serialization
    pub fn type_code(&self) -> &'static str {
        match self {
            GameEvent::SessionStart { .. } => "SE",
            GameEvent::ShotAttempted { .. } => "SA",
            GameEvent::ShotScored { .. } => "SC",
            GameEvent::ShotResolved { .. } => "SR",
            GameEvent::StreakChanged { .. } => "SK",
            GameEvent::HighScoreChanged { .. } => "HS",
            GameEvent::BallAtRest { .. } => "AR",
            GameEvent::BallReset => "RB",
        }
    }

    /// Variant name, as written in scenario expectations
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::SessionStart { .. } => "SessionStart",
            GameEvent::ShotAttempted { .. } => "ShotAttempted",
            GameEvent::ShotScored { .. } => "ShotScored",
            GameEvent::ShotResolved { .. } => "ShotResolved",
            GameEvent::StreakChanged { .. } => "StreakChanged",
            GameEvent::HighScoreChanged { .. } => "HighScoreChanged",
            GameEvent::BallAtRest { .. } => "BallAtRest",
            GameEvent::BallReset => "BallReset",
        }
    }

    /// Hoop the event refers to, if any
    pub fn side(&self) -> Option<Side> {
        match self {
            GameEvent::ShotAttempted { side, .. } | GameEvent::ShotScored { side, .. } => {
                Some(*side)
            }
            _ => None,
        }
    }
}

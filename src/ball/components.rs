//! Ball-related state and components

use bevy::prelude::*;

/// Marker for the rendered ball entity
#[derive(Component)]
pub struct Ball;

/// Simulation state of the one ball in play.
///
/// `previous_y` is written by the integrator before it moves the ball, so the
/// score detector can see which side of the rim plane the ball started the tick on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub previous_y: f32,
    pub in_flight: bool,
    pub scored_this_flight: bool,
}

impl BallState {
    /// Ball sitting still at `position`
    pub fn at_rest(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            previous_y: position.y,
            in_flight: false,
            scored_this_flight: false,
        }
    }

    /// Ball already moving, as if launched a moment ago
    pub fn launched(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            previous_y: position.y,
            in_flight: true,
            scored_this_flight: false,
        }
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Stop the ball where it is and end the flight
    pub fn settle(&mut self, rest_y: f32) {
        self.velocity = Vec3::ZERO;
        self.position.y = rest_y;
        self.previous_y = rest_y;
        self.in_flight = false;
    }
}

impl Default for BallState {
    fn default() -> Self {
        Self::at_rest(crate::constants::BALL_SPAWN)
    }
}

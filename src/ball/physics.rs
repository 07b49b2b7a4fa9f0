//! Fixed-step ball integration

use bevy::prelude::*;

use crate::ball::components::BallState;
use crate::world::horizontal;

/// Advance one tick with semi-implicit Euler: position moves with the current
/// velocity, then gravity is applied. Records `previous_y` first.
pub fn integrate(ball: &mut BallState, gravity: f32, dt: f32) {
    ball.previous_y = ball.position.y;
    ball.position += ball.velocity * dt;
    ball.velocity.y -= gravity * dt;
}

/// Rotation the ball would pick up rolling without slip this tick.
///
/// The axis is the horizontal travel direction crossed with up, the angle is the
/// arc length covered divided by the radius. Returns `None` when the ball is
/// (nearly) still or moving straight up/down.
pub fn rolling_rotation(velocity: Vec3, dt: f32, radius: f32, epsilon: f32) -> Option<Quat> {
    let speed = velocity.length();
    if speed <= epsilon || radius <= 0.0 {
        return None;
    }
    let direction = horizontal(velocity).normalize_or_zero();
    if direction == Vec3::ZERO {
        return None;
    }
    let axis = direction.cross(Vec3::Y).normalize();
    Some(Quat::from_axis_angle(axis, speed * dt / radius))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{GRAVITY, TIME_STEP};

    #[test]
    fn test_integrate_moves_before_gravity() {
        let mut ball = BallState::launched(Vec3::new(0.0, 1.0, 0.0), Vec3::new(6.0, 3.0, 0.0));
        integrate(&mut ball, GRAVITY, TIME_STEP);

        assert_eq!(ball.previous_y, 1.0);
        // Position used the pre-gravity velocity
        assert!((ball.position.y - (1.0 + 3.0 * TIME_STEP)).abs() < 1e-6);
        assert!((ball.position.x - 6.0 * TIME_STEP).abs() < 1e-6);
        assert!((ball.velocity.y - (3.0 - GRAVITY * TIME_STEP)).abs() < 1e-6);
        assert_eq!(ball.velocity.x, 6.0);
    }

    #[test]
    fn test_previous_y_tracks_each_tick() {
        let mut ball = BallState::launched(Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, -5.0, 0.0));
        integrate(&mut ball, GRAVITY, TIME_STEP);
        let after_first = ball.position.y;
        integrate(&mut ball, GRAVITY, TIME_STEP);
        assert_eq!(ball.previous_y, after_first);
    }

    #[test]
    fn test_rolling_rotation_angle_and_axis() {
        let radius = 0.12;
        let rotation = rolling_rotation(Vec3::new(6.0, 0.0, 0.0), TIME_STEP, radius, 0.01).unwrap();
        let (axis, angle) = rotation.to_axis_angle();
        assert!((angle - 6.0 * TIME_STEP / radius).abs() < 1e-4);
        // Travel direction crossed with up
        assert!((axis - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_no_rotation_at_rest_or_vertical() {
        assert!(rolling_rotation(Vec3::ZERO, TIME_STEP, 0.12, 0.01).is_none());
        assert!(rolling_rotation(Vec3::new(0.005, 0.0, 0.0), TIME_STEP, 0.12, 0.01).is_none());
        assert!(rolling_rotation(Vec3::new(0.0, -4.0, 0.0), TIME_STEP, 0.12, 0.01).is_none());
    }
}

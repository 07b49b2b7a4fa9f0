//! Launch solver: picks the lofted arc that carries the ball from the shooter to a rim

use bevy::prelude::*;

use crate::constants::{FALLBACK_LAUNCH_ANGLE, PREVIEW_SEGMENTS};
use crate::world::horizontal;

/// Launch angle and initial velocity for a shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchSolution {
    /// Elevation above the horizontal, radians
    pub angle: f32,
    pub velocity: Vec3,
    /// False when no angle at this speed reaches the target and the fallback was used
    pub feasible: bool,
}

/// Solve the projectile range equation for the high-arc launch angle.
///
/// `gravity` is the downward acceleration magnitude. With
/// `d = v^4 - g(g*dx^2 + 2*dh*v^2)`, a negative `d` means the target is out of
/// reach; the shot still goes, at 45 degrees, flagged infeasible.
pub fn solve_launch(launch: Vec3, target: Vec3, speed: f32, gravity: f32) -> LaunchSolution {
    let to_target = horizontal(target - launch);
    let dx = to_target.length();
    let dh = target.y - launch.y;
    let direction = to_target.normalize_or_zero();

    let v2 = speed * speed;
    let discriminant = v2 * v2 - gravity * (gravity * dx * dx + 2.0 * dh * v2);

    let (angle, feasible) = if discriminant < 0.0 {
        (FALLBACK_LAUNCH_ANGLE, false)
    } else {
        // dx == 0 gives +inf inside atan, i.e. straight up
        (((v2 + discriminant.sqrt()) / (gravity * dx)).atan(), true)
    };

    let velocity = direction * (speed * angle.cos()) + Vec3::Y * (speed * angle.sin());
    LaunchSolution {
        angle,
        velocity,
        feasible,
    }
}

/// Where the analytic arc puts the ball `t` seconds after launch
pub fn arc_position(launch: Vec3, velocity: Vec3, gravity: f32, t: f32) -> Vec3 {
    launch + velocity * t - Vec3::Y * (0.5 * gravity * t * t)
}

/// Sample the arc toward `target` for the aiming guide.
///
/// Samples cover the time needed to travel the horizontal distance to the target
/// (one second for a vertical shot) and stop at the first point below `floor_y`.
pub fn preview_trajectory(
    launch: Vec3,
    target: Vec3,
    speed: f32,
    gravity: f32,
    floor_y: f32,
) -> Vec<Vec3> {
    let solution = solve_launch(launch, target, speed, gravity);
    let dx = horizontal(target - launch).length();
    let horizontal_speed = horizontal(solution.velocity).length();
    let total_time = if horizontal_speed > f32::EPSILON {
        dx / horizontal_speed
    } else {
        1.0
    };

    let mut points = Vec::with_capacity(PREVIEW_SEGMENTS + 1);
    for i in 0..=PREVIEW_SEGMENTS {
        let t = total_time * i as f32 / PREVIEW_SEGMENTS as f32;
        let point = arc_position(launch, solution.velocity, gravity, t);
        if point.y < floor_y {
            break;
        }
        points.push(point);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;

    /// Height of the analytic arc when it has covered the horizontal distance dx
    fn height_at_distance(solution: &LaunchSolution, launch: Vec3, dx: f32) -> f32 {
        let vh = horizontal(solution.velocity).length();
        let t = dx / vh;
        arc_position(launch, solution.velocity, GRAVITY, t).y
    }

    #[test]
    fn test_feasible_shots_reach_target() {
        let launch = Vec3::new(0.0, READY_Y, 0.0);
        let cases = [
            (4.0, 2.1, 9.0),
            (10.0, 2.125, 13.0),
            (15.7, 2.125, 18.0),
            (6.0, -0.3, 8.0),
        ];
        for (dx, dh, v) in cases {
            let target = Vec3::new(dx, READY_Y + dh, 0.0);
            let solution = solve_launch(launch, target, v, GRAVITY);
            assert!(solution.feasible, "dx={dx} dh={dh} v={v}");
            let y = height_at_distance(&solution, launch, dx);
            assert!((y - target.y).abs() < 1e-2, "dx={dx}: arc height {y} vs {}", target.y);
        }
    }

    #[test]
    fn test_picks_high_arc() {
        let launch = Vec3::new(0.0, READY_Y, 0.0);
        let target = Vec3::new(8.0, RIM_HEIGHT, 0.0);
        let solution = solve_launch(launch, target, 14.0, GRAVITY);
        assert!(solution.feasible);
        // Both roots straddle 45 degrees plus half the elevation angle; high root is above it
        assert!(solution.angle > std::f32::consts::FRAC_PI_4);
    }

    #[test]
    fn test_full_power_from_center_is_feasible_and_lofted() {
        let launch = Vec3::new(0.0, 0.7, 0.0);
        let target = Vec3::new(16.0, 2.825, 0.0);
        let solution = solve_launch(launch, target, SHOT_MAX_SPEED, GRAVITY);
        assert!(solution.feasible);

        let vy = solution.velocity.y;
        let apex = launch.y + vy * vy / (2.0 * GRAVITY);
        assert!(apex > 2.825);
        // Still descending when it reaches x = 16
        let vh = horizontal(solution.velocity).length();
        let t = 16.0 / vh;
        assert!(vy - GRAVITY * t < 0.0);
        assert!((height_at_distance(&solution, launch, 16.0) - 2.825).abs() < 1e-2);
    }

    #[test]
    fn test_zero_power_from_center_is_infeasible() {
        let launch = Vec3::new(0.0, 0.7, 0.0);
        let target = Vec3::new(15.715, 2.825, 0.0);
        let solution = solve_launch(launch, target, SHOT_MIN_SPEED, GRAVITY);
        assert!(!solution.feasible);
        assert_eq!(solution.angle, FALLBACK_LAUNCH_ANGLE);
        // Still a usable launch toward the rim
        assert!(solution.velocity.x > 0.0);
        assert!((solution.velocity.length() - SHOT_MIN_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_velocity_points_at_target_horizontally() {
        let launch = Vec3::new(2.0, READY_Y, -3.0);
        let target = Vec3::new(15.715, RIM_HEIGHT, 0.0);
        let solution = solve_launch(launch, target, 16.0, GRAVITY);
        let dir = horizontal(target - launch).normalize();
        let vdir = horizontal(solution.velocity).normalize();
        assert!((dir - vdir).length() < 1e-5);
    }

    #[test]
    fn test_directly_below_target_shoots_straight_up() {
        let launch = Vec3::new(15.715, READY_Y, 0.0);
        let target = Vec3::new(15.715, RIM_HEIGHT, 0.0);
        let solution = solve_launch(launch, target, 10.0, GRAVITY);
        assert!(solution.feasible);
        assert!((solution.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert!(solution.velocity.is_finite());
        assert!(horizontal(solution.velocity).length() < 1e-4);
    }

    #[test]
    fn test_solver_is_deterministic() {
        let launch = Vec3::new(-3.0, READY_Y, 2.0);
        let target = Vec3::new(-15.715, RIM_HEIGHT, 0.0);
        assert_eq!(
            solve_launch(launch, target, 12.5, GRAVITY),
            solve_launch(launch, target, 12.5, GRAVITY)
        );
    }

    #[test]
    fn test_preview_stops_at_floor() {
        let launch = Vec3::new(0.0, READY_Y, 0.0);
        let target = Vec3::new(15.715, RIM_HEIGHT, 0.0);

        let full = preview_trajectory(launch, target, SHOT_MAX_SPEED, GRAVITY, GROUND_Y);
        assert_eq!(full.len(), PREVIEW_SEGMENTS + 1);
        assert!((full.last().unwrap().x - target.x).abs() < 1e-3);

        // Infeasible arc falls short and gets cut at the floor
        let short = preview_trajectory(launch, target, SHOT_MIN_SPEED, GRAVITY, GROUND_Y);
        assert!(short.len() < PREVIEW_SEGMENTS + 1);
        assert!(short.iter().all(|p| p.y >= GROUND_Y));
        assert_eq!(short[0], launch);
    }
}

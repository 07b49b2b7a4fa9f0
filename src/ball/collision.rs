//! Ball collisions against the static court: rims, walls, backboards, floor

use bevy::prelude::*;

use crate::ball::components::BallState;
use crate::tuning::PhysicsTweaks;
use crate::world::{Backboard, CourtBounds, CourtGeometry, Hoop, RimTarget, Side, horizontal};

/// Surface the ball touched during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Rim(Side),
    SideWall,
    EndWall,
    Backboard(Side),
    Ground,
}

/// Outcome of a floor contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundContact {
    Bounced,
    /// Too slow to bounce again: the ball has been parked at ready height
    Rest,
}

/// Everything that happened to the ball in one resolver pass
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CollisionReport {
    pub contacts: Vec<Surface>,
    pub came_to_rest: bool,
}

impl CollisionReport {
    pub fn touched(&self, surface: Surface) -> bool {
        self.contacts.contains(&surface)
    }
}

/// Resolve all contacts for this tick, in order: rims, walls, backboards, ground.
pub fn resolve_collisions(
    ball: &mut BallState,
    court: &CourtGeometry,
    tweaks: &PhysicsTweaks,
) -> CollisionReport {
    let mut report = CollisionReport::default();
    let radius = court.ball_radius;

    for hoop in &court.hoops {
        if collide_rim(ball, &hoop.rim, radius, tweaks) {
            report.contacts.push(Surface::Rim(hoop.side));
        }
    }

    report
        .contacts
        .extend(collide_walls(ball, &court.bounds, &court.hoops, tweaks));

    for hoop in &court.hoops {
        if collide_backboard(ball, &hoop.backboard, &hoop.rim, tweaks) {
            report.contacts.push(Surface::Backboard(hoop.side));
        }
    }

    if let Some(contact) = collide_ground(ball, court.ground_y, court.ready_y, tweaks) {
        report.contacts.push(Surface::Ground);
        report.came_to_rest = contact == GroundContact::Rest;
    }

    report
}

/// Bounce off the rim ring. Only fires when the ball is in the contact shell around
/// the ring and its horizontal motion heads toward the rim center.
pub fn collide_rim(
    ball: &mut BallState,
    rim: &RimTarget,
    ball_radius: f32,
    tweaks: &PhysicsTweaks,
) -> bool {
    let y_dist = (ball.position.y - rim.plane_y).abs();
    if ball.position.y > rim.plane_y + rim.thickness || y_dist >= ball_radius + rim.thickness {
        return false;
    }

    let offset = horizontal(ball.position - rim.center);
    let dist = offset.length();
    if (dist - rim.radius).abs() >= tweaks.rim_contact_band {
        return false;
    }

    let Some(away) = offset.try_normalize() else {
        return false;
    };
    let v_h = horizontal(ball.velocity);
    let dot = v_h.dot(away);
    if dot >= 0.0 {
        return false;
    }

    let reflected = (v_h - away * (2.0 * dot)) * tweaks.rim_restitution;
    ball.velocity.x = reflected.x;
    ball.velocity.z = reflected.z;
    ball.velocity.y *= tweaks.rim_restitution;

    // Park the ball just outside the shell so it cannot stick in the ring
    let outside = rim.center + away * (rim.radius + ball_radius + rim.thickness);
    ball.position.x = outside.x;
    ball.position.z = outside.z;
    true
}

/// Keep the ball on the court. Side walls (X) are skipped inside the relief zone
/// of the hoop on that side; end walls (Z) always apply.
pub fn collide_walls(
    ball: &mut BallState,
    bounds: &CourtBounds,
    hoops: &[Hoop],
    tweaks: &PhysicsTweaks,
) -> Vec<Surface> {
    let mut contacts = Vec::new();
    let outside_relief = |x: f32, side: Side| {
        hoops
            .iter()
            .filter(|h| h.side == side)
            .all(|h| (x - h.backboard.plane_x).abs() > tweaks.relief_zone)
    };

    if ball.position.x < bounds.min_x && outside_relief(ball.position.x, Side::Left) {
        ball.position.x = bounds.min_x;
        if ball.velocity.x < 0.0 {
            ball.velocity.x = -ball.velocity.x * tweaks.wall_restitution;
        }
        ball.velocity.z *= tweaks.tangential_damping;
        contacts.push(Surface::SideWall);
    }
    if ball.position.x > bounds.max_x && outside_relief(ball.position.x, Side::Right) {
        ball.position.x = bounds.max_x;
        if ball.velocity.x > 0.0 {
            ball.velocity.x = -ball.velocity.x * tweaks.wall_restitution;
        }
        ball.velocity.z *= tweaks.tangential_damping;
        contacts.push(Surface::SideWall);
    }

    if ball.position.z < bounds.min_z {
        ball.position.z = bounds.min_z;
        if ball.velocity.z < 0.0 {
            ball.velocity.z = -ball.velocity.z * tweaks.wall_restitution;
        }
        ball.velocity.x *= tweaks.tangential_damping;
        contacts.push(Surface::EndWall);
    }
    if ball.position.z > bounds.max_z {
        ball.position.z = bounds.max_z;
        if ball.velocity.z > 0.0 {
            ball.velocity.z = -ball.velocity.z * tweaks.wall_restitution;
        }
        ball.velocity.x *= tweaks.tangential_damping;
        contacts.push(Surface::EndWall);
    }

    contacts
}

/// Bounce off a backboard face. The ball must be inside the thin slab at the face,
/// within the board's height and width, and no higher than the rim.
pub fn collide_backboard(
    ball: &mut BallState,
    board: &Backboard,
    rim: &RimTarget,
    tweaks: &PhysicsTweaks,
) -> bool {
    let p = ball.position;
    // Signed depth in front of the face (positive toward the court)
    let depth = (p.x - board.plane_x) * board.facing;
    let in_slab = depth < tweaks.backboard_contact_inset && depth > -tweaks.backboard_slab_depth;
    let in_span = p.y > board.bottom && p.y < board.top;
    let in_width = (p.z - board.center_z).abs() < board.half_width;
    let below_rim = p.y <= rim.plane_y + rim.thickness;
    if !(in_slab && in_span && in_width && below_rim) {
        return false;
    }

    ball.position.x = board.plane_x + board.facing * tweaks.backboard_contact_inset;
    // Only reflect when moving into the board
    if ball.velocity.x * board.facing < 0.0 {
        ball.velocity.x = -ball.velocity.x * tweaks.backboard_restitution;
    }
    ball.velocity.y *= tweaks.tangential_damping;
    ball.velocity.z *= tweaks.tangential_damping;
    true
}

/// Floor contact. Bounces with restitution and friction, or puts the ball at rest
/// at `ready_y` when the impact is too soft.
pub fn collide_ground(
    ball: &mut BallState,
    ground_y: f32,
    ready_y: f32,
    tweaks: &PhysicsTweaks,
) -> Option<GroundContact> {
    if ball.position.y > ground_y || ball.velocity.y > 0.0 {
        return None;
    }

    ball.position.y = ground_y;
    if ball.velocity.y.abs() > tweaks.min_bounce_velocity {
        ball.velocity.y = -ball.velocity.y * tweaks.ground_restitution;
        ball.velocity.x *= tweaks.ground_friction;
        ball.velocity.z *= tweaks.ground_friction;
        Some(GroundContact::Bounced)
    } else {
        ball.settle(ready_y);
        Some(GroundContact::Rest)
    }
}

//! Rim glow: a short scale pulse on the rim the ball dropped through

use bevy::prelude::*;

use crate::constants::*;
use crate::events::GameEvent;
use crate::session::SessionEvents;
use crate::world::RimMarker;

/// Rim glow animation component
#[derive(Component, Debug)]
pub struct RimGlow {
    pub timer: f32, // Time remaining in glow
}

/// Scale factor for a glow with `remaining` of `duration` left.
/// Swells to 1 + RIM_GLOW_SCALE halfway through and settles back to 1.
pub fn glow_scale(remaining: f32, duration: f32) -> f32 {
    if duration <= 0.0 || remaining <= 0.0 {
        return 1.0;
    }
    let progress = (1.0 - remaining / duration).clamp(0.0, 1.0);
    1.0 + RIM_GLOW_SCALE * (progress * std::f32::consts::PI).sin()
}

/// Start a glow on every rim scored through this frame
pub fn trigger_rim_glow(
    mut commands: Commands,
    frame_events: Res<SessionEvents>,
    rims: Query<(Entity, &RimMarker)>,
) {
    for bus_event in &frame_events.events {
        let GameEvent::ShotScored { side, .. } = bus_event.event else {
            continue;
        };
        for (entity, rim) in &rims {
            if rim.0 == side {
                commands.entity(entity).insert(RimGlow {
                    timer: RIM_GLOW_DURATION,
                });
            }
        }
    }
}

/// Animate rim glow and restore the rim when it finishes
pub fn animate_rim_glow(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut RimGlow)>,
) {
    for (entity, mut transform, mut glow) in &mut query {
        glow.timer -= time.delta_secs();
        if glow.timer <= 0.0 {
            transform.scale = Vec3::ONE;
            commands.entity(entity).remove::<RimGlow>();
        } else {
            transform.scale = Vec3::splat(glow_scale(glow.timer, RIM_GLOW_DURATION));
        }
    }
}

//! Bevy glue: the session as a resource, stepped in FixedUpdate

use bevy::prelude::*;

use super::ShotSession;
use crate::ball::Ball;
use crate::events::BusEvent;
use crate::input::ShotInputQueue;

/// The session the player is driving
#[derive(Resource, Deref, DerefMut)]
pub struct ActiveSession(pub ShotSession);

/// Events drained from the session since the last frame, for Update-side readers.
/// Cleared by `clear_session_events` once every reader has run.
#[derive(Resource, Default, Debug)]
pub struct SessionEvents {
    pub events: Vec<BusEvent>,
}

/// FixedUpdate: hand queued inputs to the session before it ticks
pub fn apply_queued_inputs(mut queue: ResMut<ShotInputQueue>, mut session: ResMut<ActiveSession>) {
    for input in queue.drain() {
        session.handle_input(input);
    }
}

/// FixedUpdate: advance one tick and collect what it emitted
pub fn step_session(mut session: ResMut<ActiveSession>, mut frame_events: ResMut<SessionEvents>) {
    session.tick();
    let drained = session.drain_events();
    frame_events.events.extend(drained);
}

/// Copy the simulated ball into its transform
pub fn sync_ball_transform(
    session: Res<ActiveSession>,
    mut balls: Query<&mut Transform, With<Ball>>,
) {
    let Ok(mut transform) = balls.single_mut() else {
        return;
    };
    transform.translation = session.ball().position;
    transform.rotation = session.orientation();
}

/// Log every event at debug level
pub fn log_session_events(frame_events: Res<SessionEvents>) {
    for bus_event in &frame_events.events {
        debug!("[tick {}] {:?}", bus_event.tick, bus_event.event);
    }
}

pub fn clear_session_events(mut frame_events: ResMut<SessionEvents>) {
    frame_events.events.clear();
}

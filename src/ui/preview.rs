//! Aiming guide drawn with gizmos while the ball is waiting to be shot

use bevy::prelude::*;

use crate::constants::PREVIEW_COLOR;
use crate::session::ActiveSession;

pub fn draw_trajectory_preview(session: Res<ActiveSession>, mut gizmos: Gizmos) {
    let Some(points) = session.preview() else {
        return;
    };
    if points.len() >= 2 {
        gizmos.linestrip(points, PREVIEW_COLOR);
    }
}

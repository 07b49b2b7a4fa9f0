//! Timed "SCORE!" / "MISS" message in the middle of the screen

use bevy::prelude::*;

use crate::constants::*;
use crate::events::GameEvent;
use crate::session::SessionEvents;

/// Feedback text component
#[derive(Component)]
pub struct FeedbackText;

/// Message currently on screen and how long it has left
#[derive(Resource, Default, Debug)]
pub struct ShotFeedback {
    pub message: Option<(&'static str, Color)>,
    pub remaining: f32,
}

impl ShotFeedback {
    pub fn show(&mut self, text: &'static str, color: Color) {
        self.message = Some((text, color));
        self.remaining = FEEDBACK_DURATION;
    }

    /// Count down; clears the message when time runs out
    pub fn advance(&mut self, dt: f32) {
        if self.message.is_none() {
            return;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.message = None;
            self.remaining = 0.0;
        }
    }
}

/// Message to flash for an event, if any. A make announces itself when the ball
/// drops through; a miss only once the ball settles.
pub fn feedback_for(event: &GameEvent) -> Option<(&'static str, Color)> {
    match event {
        GameEvent::ShotScored { .. } => Some(("SCORE!", TEXT_MADE)),
        GameEvent::ShotResolved { made: false } => Some(("MISS", TEXT_MISSED)),
        _ => None,
    }
}

pub fn spawn_feedback_text(commands: &mut Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            top: Val::Percent(30.0),
            justify_content: JustifyContent::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 48.0,
                    ..default()
                },
                TextColor(TEXT_PRIMARY),
                FeedbackText,
            ));
        });
}

/// Start a message for this frame's events (the last one wins)
pub fn trigger_feedback(frame_events: Res<SessionEvents>, mut feedback: ResMut<ShotFeedback>) {
    for bus_event in &frame_events.events {
        if let Some((text, color)) = feedback_for(&bus_event.event) {
            feedback.show(text, color);
        }
    }
}

/// Tick the message timer and mirror it into the text
pub fn update_feedback_text(
    time: Res<Time>,
    mut feedback: ResMut<ShotFeedback>,
    mut text_query: Query<(&mut Text, &mut TextColor), With<FeedbackText>>,
) {
    feedback.advance(time.delta_secs());
    let Ok((mut text, mut color)) = text_query.single_mut() else {
        return;
    };
    match feedback.message {
        Some((message, message_color)) => {
            if text.0 != message {
                text.0 = message.to_string();
            }
            color.0 = message_color;
        }
        None => {
            if !text.0.is_empty() {
                text.0.clear();
            }
        }
    }
}

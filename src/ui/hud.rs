//! HUD components and systems (scoreboard and power display)

use bevy::prelude::*;

use crate::constants::*;
use crate::scoring::ScoreState;
use crate::session::ActiveSession;

/// Scoreboard text component
#[derive(Component)]
pub struct HudText;

/// Spawn the scoreboard in the top-left corner
pub fn spawn_hud(commands: &mut Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(TEXT_PRIMARY),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(12.0),
            top: Val::Px(10.0),
            ..default()
        },
        HudText,
    ));
}

/// Scoreboard lines for a session
pub fn hud_text(score: &ScoreState, power: u8) -> String {
    format!(
        "Score {}  |  Made {}/{} ({:.0}%)\nStreak {} (best {})  |  High score {}\nPower {}%",
        score.score,
        score.shots_made,
        score.shots_attempted,
        score.accuracy(),
        score.current_streak,
        score.best_streak,
        score.high_score,
        power,
    )
}

/// Update scoreboard display
pub fn update_hud(session: Res<ActiveSession>, mut text_query: Query<&mut Text, With<HudText>>) {
    let Ok(mut text) = text_query.single_mut() else {
        return;
    };
    let content = hud_text(session.score(), session.power().percent());
    if text.0 != content {
        text.0 = content;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hud_text() {
        let score = ScoreState {
            score: 6,
            shots_attempted: 4,
            shots_made: 3,
            current_streak: 2,
            best_streak: 5,
            high_score: 12,
        };
        let text = hud_text(&score, 65);
        assert!(text.contains("Score 6"));
        assert!(text.contains("Made 3/4 (75%)"));
        assert!(text.contains("Streak 2 (best 5)"));
        assert!(text.contains("High score 12"));
        assert!(text.ends_with("Power 65%"));
    }
}

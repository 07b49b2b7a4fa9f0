//! Scoring module - score detection through the rim disc and the scoreboard

use crate::ball::BallState;
use crate::constants::POINTS_PER_MAKE;
use crate::tuning::PhysicsTweaks;
use crate::world::RimTarget;

/// Scoreboard for the running session. `best_streak` and `high_score` are
/// seeded from saved records and survive restarts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreState {
    pub score: u32,
    pub shots_attempted: u32,
    pub shots_made: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub high_score: u32,
}

impl ScoreState {
    /// Fresh scoreboard carrying over persisted records
    pub fn with_records(high_score: u32, best_streak: u32) -> Self {
        Self {
            high_score,
            best_streak,
            ..Default::default()
        }
    }

    /// Percentage of attempts made, 0 when nothing has been attempted
    pub fn accuracy(&self) -> f32 {
        if self.shots_attempted == 0 {
            0.0
        } else {
            self.shots_made as f32 / self.shots_attempted as f32 * 100.0
        }
    }

    /// Count a make. Returns true when the high score was beaten.
    pub fn award_make(&mut self) -> bool {
        self.score += POINTS_PER_MAKE;
        self.shots_made += 1;
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }

    /// Extend or break the streak at the end of a possession.
    /// Returns true when the best streak was beaten.
    pub fn record_outcome(&mut self, made: bool) -> bool {
        if made {
            self.current_streak += 1;
            if self.current_streak > self.best_streak {
                self.best_streak = self.current_streak;
                return true;
            }
        } else {
            self.current_streak = 0;
        }
        false
    }
}

/// Did the ball just drop through `rim` this tick?
///
/// True at most once per flight: the ball must have started the tick above the
/// rim plane, now be at least `score_plane_epsilon` below it, be moving down,
/// and be horizontally inside the rim shrunk by `score_radius_tolerance`.
/// Marks the flight as scored when it fires.
pub fn detect_score(ball: &mut BallState, rim: &RimTarget, tweaks: &PhysicsTweaks) -> bool {
    if ball.scored_this_flight {
        return false;
    }
    let crossed = ball.previous_y > rim.plane_y
        && ball.position.y <= rim.plane_y - tweaks.score_plane_epsilon;
    let inside =
        rim.horizontal_distance(ball.position) < rim.radius * tweaks.score_radius_tolerance;
    if crossed && inside && ball.velocity.y < 0.0 {
        ball.scored_this_flight = true;
        true
    } else {
        false
    }
}

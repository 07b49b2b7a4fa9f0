//! Assertion checking for test expectations

use super::parser::{ExpectedCount, ExpectedEvent, StateAssertion};
use crate::events::{BusEvent, GameEvent};
use crate::session::{ShotPhase, ShotSession};

/// Error when an assertion fails
#[derive(Debug)]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

impl std::fmt::Display for AssertionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n    Expected: {}\n    Actual: {}", self.message, self.expected, self.actual)
    }
}

/// Captured event with timing info
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub frame: u64,
    pub event_type: String,
    pub side: Option<String>,
    pub made: Option<bool>,
}

impl CapturedEvent {
    pub fn from_bus_event(bus_event: &BusEvent) -> Self {
        let made = match bus_event.event {
            GameEvent::ShotResolved { made } => Some(made),
            _ => None,
        };
        Self {
            frame: bus_event.tick,
            event_type: bus_event.event.name().to_string(),
            side: bus_event.event.side().map(|s| s.name().to_string()),
            made,
        }
    }

    fn matches(&self, expected: &ExpectedEvent) -> bool {
        if self.event_type != expected.event {
            return false;
        }
        if let Some(ref side) = expected.side
            && self.side.as_ref() != Some(side)
        {
            return false;
        }
        if let Some(made) = expected.made
            && self.made != Some(made)
        {
            return false;
        }
        true
    }
}

/// Check if captured events match expected sequence
pub fn check_sequence(
    expected: &[ExpectedEvent],
    captured: &[CapturedEvent],
) -> Result<(), AssertionError> {
    let mut captured_idx = 0;

    for (i, exp) in expected.iter().enumerate() {
        // Find matching event starting from current position
        let found = captured[captured_idx..]
            .iter()
            .enumerate()
            .find(|(_, cap)| cap.matches(exp));

        match found {
            Some((offset, cap)) => {
                if let Some(min) = exp.frame_min
                    && cap.frame < min
                {
                    return Err(AssertionError {
                        message: format!("Event #{} '{}' occurred too early", i + 1, exp.event),
                        expected: format!("frame >= {}", min),
                        actual: format!("frame {}", cap.frame),
                    });
                }
                if let Some(max) = exp.frame_max
                    && cap.frame > max
                {
                    return Err(AssertionError {
                        message: format!("Event #{} '{}' occurred too late", i + 1, exp.event),
                        expected: format!("frame <= {}", max),
                        actual: format!("frame {}", cap.frame),
                    });
                }
                captured_idx += offset + 1;
            }
            None => {
                let side_str = exp
                    .side
                    .as_ref()
                    .map(|s| format!(" (side: {})", s))
                    .unwrap_or_default();
                return Err(AssertionError {
                    message: format!("Event #{} '{}'{} not found", i + 1, exp.event, side_str),
                    expected: format!("'{}' event in sequence", exp.event),
                    actual: format!(
                        "events after position {}: {:?}",
                        captured_idx,
                        captured[captured_idx..].iter().map(|e| &e.event_type).collect::<Vec<_>>()
                    ),
                });
            }
        }
    }

    Ok(())
}

/// Check how many times each named event fired
pub fn check_counts(
    expected: &[ExpectedCount],
    captured: &[CapturedEvent],
) -> Result<(), AssertionError> {
    for exp in expected {
        let actual = captured.iter().filter(|c| c.event_type == exp.event).count();
        if actual != exp.equals {
            return Err(AssertionError {
                message: format!("Event count check failed for '{}'", exp.event),
                expected: exp.equals.to_string(),
                actual: actual.to_string(),
            });
        }
    }
    Ok(())
}

/// Snapshot of the session for assertions
#[derive(Debug, Clone)]
pub struct WorldState {
    pub score: u32,
    pub shots_attempted: u32,
    pub shots_made: u32,
    pub streak: u32,
    pub best_streak: u32,
    pub high_score: u32,
    pub phase: String,
    pub power: u8,
    pub ball: BallSnapshot,
}

#[derive(Debug, Clone)]
pub struct BallSnapshot {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub velocity_x: f32,
    pub velocity_y: f32,
    pub velocity_z: f32,
    pub in_flight: bool,
}

impl WorldState {
    pub fn capture(session: &ShotSession) -> Self {
        let score = session.score();
        let ball = session.ball();
        let phase = match session.phase() {
            ShotPhase::Ready => "ready",
            ShotPhase::InFlight => "in_flight",
            ShotPhase::Resolved { .. } => "resolved",
        };
        Self {
            score: score.score,
            shots_attempted: score.shots_attempted,
            shots_made: score.shots_made,
            streak: score.current_streak,
            best_streak: score.best_streak,
            high_score: score.high_score,
            phase: phase.to_string(),
            power: session.power().percent(),
            ball: BallSnapshot {
                x: ball.position.x,
                y: ball.position.y,
                z: ball.position.z,
                velocity_x: ball.velocity.x,
                velocity_y: ball.velocity.y,
                velocity_z: ball.velocity.z,
                in_flight: ball.in_flight,
            },
        }
    }
}

/// Parse a check string into (path, operator, value)
fn parse_check(check: &str) -> Option<(&str, &str, &str)> {
    // Try operators in order of specificity (>= before >, etc.)
    for op in &[">=", "<=", "!=", "=", ">", "<"] {
        if let Some(idx) = check.find(op) {
            let path = check[..idx].trim();
            let value = check[idx + op.len()..].trim();
            return Some((path, op, value));
        }
    }
    None
}

/// Check state assertions against world state
pub fn check_state(assertion: &StateAssertion, state: &WorldState) -> Result<(), AssertionError> {
    for check in &assertion.checks {
        let (path, operator, expected_value) = parse_check(check).ok_or_else(|| AssertionError {
            message: format!("Invalid check syntax: {}", check),
            expected: "format: 'property = value' or 'ball.property > value'".to_string(),
            actual: check.clone(),
        })?;

        let numeric = match path {
            "score" => Some(state.score as f32),
            "shots_attempted" => Some(state.shots_attempted as f32),
            "shots_made" => Some(state.shots_made as f32),
            "streak" => Some(state.streak as f32),
            "best_streak" => Some(state.best_streak as f32),
            "high_score" => Some(state.high_score as f32),
            "power" => Some(state.power as f32),
            "ball.x" => Some(state.ball.x),
            "ball.y" => Some(state.ball.y),
            "ball.z" => Some(state.ball.z),
            "ball.velocity_x" => Some(state.ball.velocity_x),
            "ball.velocity_y" => Some(state.ball.velocity_y),
            "ball.velocity_z" => Some(state.ball.velocity_z),
            _ => None,
        };

        match (path, numeric) {
            (_, Some(actual)) => check_float_comparison(path, actual, operator, expected_value)?,
            ("phase", None) => check_text(check, &state.phase, operator, expected_value)?,
            ("ball.in_flight", None) => {
                let in_flight = state.ball.in_flight.to_string();
                check_text(check, &in_flight, operator, expected_value)?
            }
            _ => {
                return Err(AssertionError {
                    message: format!("Unknown property '{}'", path),
                    expected: "a scoreboard field, power, phase or ball.*".to_string(),
                    actual: path.to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Equality check on a textual property
fn check_text(
    check: &str,
    actual: &str,
    operator: &str,
    expected_str: &str,
) -> Result<(), AssertionError> {
    let expected = expected_str.trim_matches('"');
    let pass = match operator {
        "=" => actual == expected,
        "!=" => actual != expected,
        _ => {
            return Err(AssertionError {
                message: format!("Operator '{}' not supported: {}", operator, check),
                expected: "= or !=".to_string(),
                actual: operator.to_string(),
            });
        }
    };
    if !pass {
        return Err(AssertionError {
            message: format!("Check failed: {}", check),
            expected: format!("{} {}", operator, expected),
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// Check float comparison with operator
fn check_float_comparison(
    path: &str,
    actual: f32,
    operator: &str,
    expected_str: &str,
) -> Result<(), AssertionError> {
    let value: f32 = expected_str.trim().parse().map_err(|_| AssertionError {
        message: format!("Invalid value for {}", path),
        expected: "number".to_string(),
        actual: expected_str.to_string(),
    })?;

    let pass = match operator {
        ">=" => actual >= value,
        "<=" => actual <= value,
        ">" => actual > value,
        "<" => actual < value,
        "=" => (actual - value).abs() < 0.01,
        "!=" => (actual - value).abs() >= 0.01,
        _ => false,
    };

    if !pass {
        return Err(AssertionError {
            message: format!(
                "Check failed: {} {} {} (actual: {:.2})",
                path, operator, expected_str, actual
            ),
            expected: format!("{} {} {}", path, operator, value),
            actual: format!("{:.2}", actual),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Side;

    fn captured(frame: u64, event: GameEvent) -> CapturedEvent {
        CapturedEvent::from_bus_event(&BusEvent { tick: frame, event })
    }

    fn expected(event: &str) -> ExpectedEvent {
        ExpectedEvent {
            event: event.to_string(),
            side: None,
            made: None,
            frame_min: None,
            frame_max: None,
        }
    }

    #[test]
    fn test_sequence_in_order_with_filters() {
        let events = vec![
            captured(
                1,
                GameEvent::ShotAttempted {
                    side: Side::Right,
                    power: 100,
                    speed: 18.0,
                    angle: 1.0,
                    feasible: true,
                    origin: bevy::prelude::Vec3::ZERO,
                },
            ),
            captured(200, GameEvent::ShotScored { side: Side::Right, score: 2 }),
            captured(600, GameEvent::ShotResolved { made: true }),
        ];

        let mut attempt = expected("ShotAttempted");
        attempt.side = Some("right".into());
        let mut resolved = expected("ShotResolved");
        resolved.made = Some(true);
        resolved.frame_min = Some(300);
        assert!(check_sequence(&[attempt, expected("ShotScored"), resolved], &events).is_ok());

        let mut wrong_side = expected("ShotScored");
        wrong_side.side = Some("left".into());
        assert!(check_sequence(&[wrong_side], &events).is_err());

        let mut late = expected("ShotScored");
        late.frame_max = Some(100);
        let err = check_sequence(&[late], &events).unwrap_err();
        assert!(err.message.contains("too late"));

        // Order matters
        let reversed = [expected("ShotResolved"), expected("ShotScored")];
        assert!(check_sequence(&reversed, &events).is_err());
    }

    #[test]
    fn test_counts() {
        let events = vec![
            captured(5, GameEvent::BallReset),
            captured(9, GameEvent::BallReset),
        ];
        let ok = ExpectedCount { event: "BallReset".into(), equals: 2 };
        let none = ExpectedCount { event: "ShotScored".into(), equals: 0 };
        assert!(check_counts(&[ok, none], &events).is_ok());
        let wrong = ExpectedCount { event: "BallReset".into(), equals: 1 };
        assert!(check_counts(&[wrong], &events).is_err());
    }

    #[test]
    fn test_state_checks() {
        let state = WorldState::capture(&ShotSession::default());
        let assertion = StateAssertion {
            after_frame: 0,
            checks: vec![
                "phase = ready".into(),
                "score = 0".into(),
                "power = 50".into(),
                "ball.y >= 0.69".into(),
                "ball.in_flight = false".into(),
            ],
        };
        assert!(check_state(&assertion, &state).is_ok());

        let failing = StateAssertion {
            after_frame: 0,
            checks: vec!["ball.x > 1.0".into()],
        };
        assert!(check_state(&failing, &state).is_err());

        let unknown = StateAssertion {
            after_frame: 0,
            checks: vec!["player.x = 0".into()],
        };
        assert!(check_state(&unknown, &state).is_err());
    }
}

//! Test execution engine
//!
//! Scenarios drive a headless `ShotSession` directly: each frame applies that
//! frame's scripted inputs, advances one fixed tick, then collects the events and
//! runs any state checks due on that frame.

use bevy::prelude::*;

use crate::ball::BallState;
use crate::shooting::ShotPower;
use crate::session::ShotSession;
use crate::tuning::PhysicsTweaks;
use crate::world::CourtGeometry;

use super::assertions::{
    AssertionError, CapturedEvent, WorldState, check_counts, check_sequence, check_state,
};
use super::input::ScriptedInputs;
use super::parser::{BallDef, TestDefinition};

/// Frames run when a scenario names no later frame of its own
const DEFAULT_FRAMES: u64 = 60;

/// Result of running a test
#[derive(Debug)]
pub enum TestResult {
    Pass { frames: u64 },
    Fail { error: AssertionError },
    Error { message: String },
}

/// Run a single test with default tuning and return the result
pub fn run_test(test: &TestDefinition) -> TestResult {
    run_test_with(test, PhysicsTweaks::default())
}

/// Run a single test with the given tuning
pub fn run_test_with(test: &TestDefinition, tweaks: PhysicsTweaks) -> TestResult {
    let mut scripted = match ScriptedInputs::from_inputs(&test.input) {
        Ok(s) => s,
        Err(message) => return TestResult::Error { message },
    };

    // Run long enough to reach every state check and frame bound
    for state in &test.expect.state {
        scripted.set_max_frame(state.after_frame);
    }
    for expected in &test.expect.sequence {
        if let Some(max) = expected.frame_max {
            scripted.set_max_frame(max);
        }
    }
    if let Some(frames) = test.setup.frames {
        scripted.set_max_frame(frames);
    }
    if scripted.max_frame == 0 {
        scripted.max_frame = DEFAULT_FRAMES;
    }

    let mut session = build_session(test, tweaks);
    let mut captured: Vec<CapturedEvent> = Vec::new();

    let mut state_checks = test.expect.state.clone();
    state_checks.sort_by_key(|s| s.after_frame);
    let mut next_check = 0;

    // Checks on frame 0 see the scenario before anything runs
    for frame in 0..=scripted.max_frame {
        session.events_mut().set_tick(frame);
        for input in scripted.inputs_for(frame) {
            session.handle_input(*input);
        }
        if frame > 0 {
            session.tick();
        }
        captured.extend(session.drain_events().iter().map(CapturedEvent::from_bus_event));

        while next_check < state_checks.len() && state_checks[next_check].after_frame == frame {
            let state = WorldState::capture(&session);
            if let Err(error) = check_state(&state_checks[next_check], &state) {
                return TestResult::Fail {
                    error: AssertionError {
                        message: format!("Frame {}: {}", frame, error.message),
                        ..error
                    },
                };
            }
            next_check += 1;
        }
    }

    debug!(
        "Scenario '{}' captured {} events over {} frames",
        test.name,
        captured.len(),
        scripted.max_frame
    );

    if let Err(error) = check_sequence(&test.expect.sequence, &captured) {
        return TestResult::Fail { error };
    }
    if let Err(error) = check_counts(&test.expect.count, &captured) {
        return TestResult::Fail { error };
    }

    TestResult::Pass {
        frames: scripted.max_frame,
    }
}

fn build_session(test: &TestDefinition, tweaks: PhysicsTweaks) -> ShotSession {
    let court = CourtGeometry::standard();
    let ready_y = court.ready_y;
    let mut session = ShotSession::new(court, tweaks)
        .with_records(test.setup.high_score, test.setup.best_streak);
    if let Some(power) = test.setup.power {
        session = session.with_power(ShotPower::new(power));
    }
    if let Some(ref ball) = test.setup.ball {
        session.place_ball(ball_state(ball, ready_y));
    }
    session
}

fn ball_state(def: &BallDef, ready_y: f32) -> BallState {
    let position = Vec3::new(def.x, def.y.unwrap_or(ready_y), def.z);
    if def.in_flight {
        BallState::launched(position, Vec3::new(def.velocity_x, def.velocity_y, def.velocity_z))
    } else {
        BallState::at_rest(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::parser::parse_test_str;

    fn run(toml: &str) -> TestResult {
        let def = parse_test_str(toml, "inline").unwrap();
        run_test(&def)
    }

    #[test]
    fn test_passing_scenario() {
        let result = run(r#"
name = "power adjust"
[[input]]
frame = 2
actions = ["power_up", "power_up"]

[[expect.state]]
after_frame = 0
checks = ["power = 50"]

[[expect.state]]
after_frame = 3
checks = ["power = 60", "phase = ready"]
"#);
        assert!(matches!(result, TestResult::Pass { frames: 3 }), "{:?}", result);
    }

    #[test]
    fn test_failing_state_names_frame() {
        let result = run(r#"
name = "wrong power"
[[expect.state]]
after_frame = 5
checks = ["power = 70"]
"#);
        match result {
            TestResult::Fail { error } => assert!(error.message.starts_with("Frame 5")),
            other => panic!("Expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_action_is_error() {
        let result = run(r#"
name = "bad action"
[[input]]
frame = 1
actions = ["crossover"]
"#);
        assert!(matches!(result, TestResult::Error { .. }));
    }

    #[test]
    fn test_shot_event_stamped_with_input_frame() {
        let result = run(r#"
name = "shot frame"
[[input]]
frame = 4
actions = ["shoot"]

[[expect.sequence]]
event = "ShotAttempted"
side = "right"
frame_min = 4
frame_max = 4
"#);
        assert!(matches!(result, TestResult::Pass { .. }), "{:?}", result);
    }
}

//! Scenario testing system for deterministic shot testing
//!
//! Scenarios are TOML files that script inputs frame by frame against a headless
//! shot session and assert on the events it emits and the state it ends up in.

pub mod assertions;
pub mod input;
pub mod parser;
pub mod runner;

pub use assertions::{
    AssertionError, CapturedEvent, WorldState, check_counts, check_sequence, check_state,
};
pub use input::ScriptedInputs;
pub use parser::{
    BallDef, ExpectedCount, ExpectedEvent, FrameInput, StateAssertion, TestDefinition,
    TestExpectations, TestSetup,
};
pub use runner::{TestResult, run_test, run_test_with};

/// Default path for test scenarios
pub const SCENARIOS_DIR: &str = "tests/scenarios";

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLED: &[(&str, &str)] = &[
        ("full_power_center", include_str!("../../tests/scenarios/full_power_center.toml")),
        ("zero_power_center", include_str!("../../tests/scenarios/zero_power_center.toml")),
        ("drop_through_left_rim", include_str!("../../tests/scenarios/drop_through_left_rim.toml")),
        ("reset_mid_flight", include_str!("../../tests/scenarios/reset_mid_flight.toml")),
        ("move_and_aim_left", include_str!("../../tests/scenarios/move_and_aim_left.toml")),
    ];

    #[test]
    fn test_bundled_scenarios_pass() {
        for (name, content) in BUNDLED {
            let def = parser::parse_test_str(content, name).unwrap();
            match run_test(&def) {
                TestResult::Pass { .. } => {}
                TestResult::Fail { error } => panic!("{}: {}", name, error),
                TestResult::Error { message } => panic!("{}: {}", name, message),
            }
        }
    }
}

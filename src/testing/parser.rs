//! TOML test file parsing

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Complete test definition from TOML file
#[derive(Debug, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub setup: TestSetup,
    #[serde(default)]
    pub input: Vec<FrameInput>,
    #[serde(default)]
    pub expect: TestExpectations,
}

/// Test setup configuration
#[derive(Debug, Default, Deserialize)]
pub struct TestSetup {
    /// Shot power in percent (default 50)
    pub power: Option<u8>,
    #[serde(default)]
    pub high_score: u32,
    #[serde(default)]
    pub best_streak: u32,
    /// Ball placement; omitted = resting at center court
    pub ball: Option<BallDef>,
    /// Run at least this many frames even without later inputs or checks
    pub frames: Option<u64>,
}

/// Initial ball state
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BallDef {
    pub x: f32,
    /// Defaults to ready height
    pub y: Option<f32>,
    #[serde(default)]
    pub z: f32,
    #[serde(default)]
    pub velocity_x: f32,
    #[serde(default)]
    pub velocity_y: f32,
    #[serde(default)]
    pub velocity_z: f32,
    /// Start mid-flight with the velocity above
    #[serde(default)]
    pub in_flight: bool,
}

/// Actions applied at the start of a frame, before it ticks
#[derive(Debug, Deserialize)]
pub struct FrameInput {
    pub frame: u64,
    #[serde(default)]
    pub actions: Vec<String>,
}

/// Expected test outcomes
#[derive(Debug, Default, Deserialize)]
pub struct TestExpectations {
    #[serde(default)]
    pub sequence: Vec<ExpectedEvent>,
    /// Exact number of times an event fires over the whole run
    #[serde(default)]
    pub count: Vec<ExpectedCount>,
    /// Multiple state assertions at different frames (uses [[expect.state]] TOML syntax)
    #[serde(default)]
    pub state: Vec<StateAssertion>,
}

/// Expected event in sequence
#[derive(Debug, Deserialize)]
pub struct ExpectedEvent {
    pub event: String,
    /// "left" or "right" for events tied to a hoop
    pub side: Option<String>,
    /// For ShotResolved
    pub made: Option<bool>,
    pub frame_min: Option<u64>,
    pub frame_max: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectedCount {
    pub event: String,
    pub equals: usize,
}

/// State assertion after simulation
#[derive(Debug, Clone, Deserialize)]
pub struct StateAssertion {
    pub after_frame: u64,
    #[serde(default)]
    pub checks: Vec<String>,
}

/// Parse a test definition from TOML text. `label` names the source in errors.
pub fn parse_test_str(content: &str, label: &str) -> Result<TestDefinition, String> {
    toml::from_str(content).map_err(|e| format!("Failed to parse {}: {}", label, e))
}

/// Parse a test file from path
pub fn parse_test_file(path: &Path) -> Result<TestDefinition, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    parse_test_str(&content, &path.display().to_string())
}

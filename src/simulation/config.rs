//! Simulation configuration

use serde::{Deserialize, Serialize};

/// Simulation mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SimMode {
    /// Random court positions and powers
    Random { shots: u32 },
    /// Every power step from one spot, repeated
    Spot { x: f32, z: f32, rounds: u32 },
}

impl Default for SimMode {
    fn default() -> Self {
        SimMode::Random { shots: 1000 }
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub mode: SimMode,
    /// RNG seed for reproducibility (None = random)
    pub seed: Option<u64>,
    /// Number of parallel threads (0 = sequential, N = N threads)
    pub parallel: usize,
    /// Path to SQLite database for storing shots
    pub db_path: Option<String>,
    /// Tuning file to simulate with (None = gameplay tuning)
    pub tuning_file: Option<String>,
    /// Output JSON summary to this file (None = stdout)
    pub output_file: Option<String>,
    /// Suppress progress output
    pub quiet: bool,
}

/// Local simulation settings (gitignored, user's custom settings)
pub const SIM_SETTINGS_FILE: &str = "config/simulation_settings.json";

impl SimConfig {
    /// Load configuration from a JSON settings file
    pub fn from_file(path: &str) -> Result<Self, String> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path, e))
    }

    /// Parse configuration from command line arguments
    pub fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::parse_args(&args[1..])
    }

    /// Settings file (if any) first, then flags on top
    pub fn parse_args(args: &[String]) -> Self {
        let mut config = Self::from_file(SIM_SETTINGS_FILE).unwrap_or_default();

        if let Some(pos) = args.iter().position(|a| a == "--settings")
            && let Some(path) = args.get(pos + 1)
        {
            match Self::from_file(path) {
                Ok(loaded) => config = loaded,
                Err(e) => eprintln!("Warning: {}", e),
            }
        }

        let mut i = 0;
        while i < args.len() {
            let value = args.get(i + 1);
            match args[i].as_str() {
                "--settings" => {
                    i += 1;
                }
                "--shots" => {
                    if let Some(v) = value {
                        config.mode = SimMode::Random {
                            shots: v.parse().unwrap_or(1000),
                        };
                        i += 1;
                    }
                }
                "--spot" => {
                    // --spot x,z[,rounds]
                    if let Some(v) = value {
                        let parts: Vec<f32> =
                            v.split(',').filter_map(|s| s.trim().parse().ok()).collect();
                        if parts.len() >= 2 {
                            config.mode = SimMode::Spot {
                                x: parts[0],
                                z: parts[1],
                                rounds: parts.get(2).map(|r| *r as u32).unwrap_or(1),
                            };
                        }
                        i += 1;
                    }
                }
                "--seed" => {
                    if let Some(v) = value {
                        config.seed = v.parse().ok();
                        i += 1;
                    }
                }
                "--parallel" => {
                    if let Some(v) = value {
                        config.parallel = v.parse().unwrap_or(0);
                        i += 1;
                    }
                }
                "--db" => {
                    if let Some(v) = value {
                        config.db_path = Some(v.clone());
                        i += 1;
                    }
                }
                "--tuning" => {
                    if let Some(v) = value {
                        config.tuning_file = Some(v.clone());
                        i += 1;
                    }
                }
                "--output" => {
                    if let Some(v) = value {
                        config.output_file = Some(v.clone());
                        i += 1;
                    }
                }
                "--quiet" | "-q" => {
                    config.quiet = true;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                other => eprintln!("Warning: ignoring unknown argument {}", other),
            }
            i += 1;
        }

        config
    }
}

fn print_help() {
    println!(
        r#"Shot Simulation Tool - headless shots against the court physics

USAGE:
    cargo run --bin simulate -- [OPTIONS]

OPTIONS:
    --settings <FILE>   Load settings from JSON file (CLI args override file settings)
    --shots <N>         Fire N shots from random spots at random powers (default: 1000)
    --spot <X,Z[,R]>    Fire every power step from one spot, R rounds
    --seed <N>          RNG seed for reproducibility
    --parallel <N>      Run shots in parallel with N threads
    --db <FILE>         Store every shot in a SQLite database
    --tuning <FILE>     Physics tuning JSON (default: config/gameplay_tuning.json)
    --output <FILE>     Write the JSON summary to a file (default: stdout)
    --quiet, -q         Suppress progress output
    --help, -h          Show this help

EXAMPLES:
    cargo run --bin simulate -- --shots 5000 --seed 7 --parallel 8
    cargo run --bin simulate -- --spot 6.0,-2.0 --db db/shots.db
"#
    );
}

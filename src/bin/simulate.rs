//! Shot Simulation Tool - headless shots for tuning and analysis
//!
//! Fires shots through the game's shot session without rendering and reports
//! make rates by power band.
//!
//! Usage:
//!   cargo run --bin simulate -- --help
//!   cargo run --bin simulate -- --shots 5000 --seed 7 --parallel 8
//!   cargo run --bin simulate -- --spot -6.0,2.5,3 --db db/shots.db

use hoopshot::simulation::{SimConfig, run_simulation};

fn main() {
    let config = SimConfig::from_args();
    run_simulation(config);
}

//! Shot simulation - headless shots for tuning and analysis
//!
//! Fires shots through the same `ShotSession` the game uses, without rendering,
//! and collects make rates.

pub mod config;
pub mod metrics;
pub mod parallel;
pub mod runner;

pub use config::{SimConfig, SimMode};
pub use metrics::{PowerBandStats, SimSummary};
pub use parallel::{
    HeatmapGrid, cell_center, init_parallel, power_steps, run_heatmap_parallel, run_shots_parallel,
};
pub use runner::{MAX_SHOT_TICKS, ShotOutcome, ShotSpec, run_simulation, simulate_shot};

//! Aggregate statistics over simulated shots

use serde::{Deserialize, Serialize};

use super::runner::ShotOutcome;

/// Width of a power band in the summary, in percent
pub const POWER_BAND_WIDTH: u8 = 20;

/// Make rate for one range of powers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerBandStats {
    pub min_power: u8,
    pub max_power: u8,
    pub shots: u32,
    pub made: u32,
    pub infeasible: u32,
}

impl PowerBandStats {
    pub fn make_rate(&self) -> f32 {
        if self.shots == 0 {
            0.0
        } else {
            self.made as f32 / self.shots as f32
        }
    }
}

/// Summary of a simulation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimSummary {
    pub shots: u32,
    pub made: u32,
    pub infeasible: u32,
    /// Shots still moving when the tick limit hit
    pub unresolved: u32,
    pub avg_flight_ticks: f32,
    pub bands: Vec<PowerBandStats>,
}

/// Band index for a power; 100 joins the top band
fn band_index(power: u8) -> usize {
    (power.min(99) / POWER_BAND_WIDTH) as usize
}

impl SimSummary {
    pub fn from_outcomes(outcomes: &[ShotOutcome]) -> Self {
        let band_count = band_index(100) + 1;
        let mut bands: Vec<PowerBandStats> = (0..band_count)
            .map(|i| {
                let min_power = i as u8 * POWER_BAND_WIDTH;
                PowerBandStats {
                    min_power,
                    max_power: if i + 1 == band_count {
                        100
                    } else {
                        min_power + POWER_BAND_WIDTH - 1
                    },
                    ..Default::default()
                }
            })
            .collect();

        let mut summary = SimSummary::default();
        let mut tick_sum = 0u64;
        for outcome in outcomes {
            summary.shots += 1;
            tick_sum += outcome.ticks as u64;
            let band = &mut bands[band_index(outcome.spec.power)];
            band.shots += 1;
            if outcome.made {
                summary.made += 1;
                band.made += 1;
            }
            if !outcome.feasible {
                summary.infeasible += 1;
                band.infeasible += 1;
            }
            if !outcome.resolved {
                summary.unresolved += 1;
            }
        }
        if summary.shots > 0 {
            summary.avg_flight_ticks = tick_sum as f32 / summary.shots as f32;
        }
        summary.bands = bands;
        summary
    }

    pub fn make_rate(&self) -> f32 {
        if self.shots == 0 {
            0.0
        } else {
            self.made as f32 / self.shots as f32
        }
    }

    /// Print a human-readable table
    pub fn print(&self) {
        println!("\n=== Shot Simulation ===");
        println!(
            "Shots: {}  Made: {} ({:.1}%)  Out of range: {}  Unresolved: {}",
            self.shots,
            self.made,
            self.make_rate() * 100.0,
            self.infeasible,
            self.unresolved
        );
        println!("Average flight: {:.0} ticks", self.avg_flight_ticks);
        println!(
            "\n{:<10} {:>7} {:>7} {:>8} {:>12}",
            "Power", "Shots", "Made", "Rate", "Out of range"
        );
        for band in &self.bands {
            println!(
                "{:>3}-{:<6} {:>7} {:>7} {:>7.1}% {:>12}",
                band.min_power,
                band.max_power,
                band.shots,
                band.made,
                band.make_rate() * 100.0,
                band.infeasible
            );
        }
    }
}

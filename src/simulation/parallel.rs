//! Parallel shot execution
//!
//! Uses Rayon to run many independent shots concurrently, plus the generators
//! for the shot batches the tools fire.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::tuning::PhysicsTweaks;
use crate::world::CourtGeometry;

use super::runner::{ShotOutcome, ShotSpec, simulate_shot};

/// Initialize the global Rayon pool with the given thread count.
/// Call this once at startup before running parallel simulations.
pub fn init_parallel(threads: usize) {
    if threads > 0
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        eprintln!("Warning: could not size thread pool: {}", e);
    }
    // If threads == 0, use Rayon's default (auto-detect)
}

/// Run shots in parallel. Results come back in the same order as `specs`.
pub fn run_shots_parallel(
    specs: &[ShotSpec],
    court: &CourtGeometry,
    tweaks: &PhysicsTweaks,
) -> Vec<ShotOutcome> {
    specs
        .par_iter()
        .map(|spec| simulate_shot(*spec, court, tweaks))
        .collect()
}

/// Every power step the player can select, 0 to 100
pub fn power_steps(step: u8) -> Vec<u8> {
    let step = step.max(1);
    (0..=100u8).step_by(step as usize).collect()
}

/// Random spots on the court at random selectable powers
pub fn random_specs(count: usize, seed: u64, court: &CourtGeometry) -> Vec<ShotSpec> {
    let mut rng = StdRng::seed_from_u64(seed);
    let powers = power_steps(crate::constants::POWER_STEP);
    let b = court.bounds;
    (0..count)
        .map(|_| ShotSpec {
            origin: Vec3::new(
                rng.gen_range(b.min_x..=b.max_x),
                court.ready_y,
                rng.gen_range(b.min_z..=b.max_z),
            ),
            power: powers[rng.gen_range(0..powers.len())],
        })
        .collect()
}

/// Every power step from one spot, `rounds` times over
pub fn spot_specs(origin: Vec3, rounds: u32, court: &CourtGeometry) -> Vec<ShotSpec> {
    let mut origin = court.bounds.clamp(origin);
    origin.y = court.ready_y;
    let powers = power_steps(crate::constants::POWER_STEP);
    (0..rounds)
        .flat_map(|_| powers.iter().map(move |&power| ShotSpec { origin, power }))
        .collect()
}

/// Court split into a `cols` x `rows` grid (X by Z)
#[derive(Debug, Clone)]
pub struct HeatmapGrid {
    pub cols: usize,
    pub rows: usize,
    /// Row-major, row 0 at min Z
    pub values: Vec<f32>,
}

impl HeatmapGrid {
    pub fn get(&self, col: usize, row: usize) -> f32 {
        self.values[row * self.cols + col]
    }
}

/// Center of a grid cell in court coordinates
pub fn cell_center(
    court: &CourtGeometry,
    cols: usize,
    rows: usize,
    col: usize,
    row: usize,
) -> Vec3 {
    let b = court.bounds;
    let x = b.min_x + (b.max_x - b.min_x) * (col as f32 + 0.5) / cols as f32;
    let z = b.min_z + (b.max_z - b.min_z) * (row as f32 + 0.5) / rows as f32;
    Vec3::new(x, court.ready_y, z)
}

/// For every cell, the fraction of power steps whose shot goes in
pub fn run_heatmap_parallel(
    court: &CourtGeometry,
    tweaks: &PhysicsTweaks,
    cols: usize,
    rows: usize,
    power_step: u8,
) -> HeatmapGrid {
    let powers = power_steps(power_step);
    let values: Vec<f32> = (0..cols * rows)
        .into_par_iter()
        .map(|i| {
            let origin = cell_center(court, cols, rows, i % cols, i / cols);
            let made = powers
                .iter()
                .filter(|&&power| simulate_shot(ShotSpec { origin, power }, court, tweaks).made)
                .count();
            made as f32 / powers.len() as f32
        })
        .collect();
    HeatmapGrid { cols, rows, values }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_specs_deterministic_and_on_court() {
        let court = CourtGeometry::standard();
        let a = random_specs(50, 42, &court);
        let b = random_specs(50, 42, &court);
        assert_eq!(a, b);
        assert!(a.iter().all(|s| court.bounds.contains(s.origin)));
        assert!(a.iter().all(|s| s.power <= 100 && s.power % 5 == 0));
    }

    #[test]
    fn test_power_steps() {
        let steps = power_steps(5);
        assert_eq!(steps.len(), 21);
        assert_eq!(steps.first(), Some(&0));
        assert_eq!(steps.last(), Some(&100));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let court = CourtGeometry::standard();
        let tweaks = PhysicsTweaks::default();
        let specs = random_specs(12, 3, &court);
        let parallel = run_shots_parallel(&specs, &court, &tweaks);
        let sequential: Vec<_> = specs.iter().map(|s| simulate_shot(*s, &court, &tweaks)).collect();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_small_heatmap() {
        let court = CourtGeometry::standard();
        let grid = run_heatmap_parallel(&court, &PhysicsTweaks::default(), 3, 2, 25);
        assert_eq!(grid.values.len(), 6);
        assert!(grid.values.iter().all(|v| (0.0..=1.0).contains(v)));
        let corner = cell_center(&court, 3, 2, 0, 0);
        assert!(corner.x < 0.0 && corner.z < 0.0);
    }
}

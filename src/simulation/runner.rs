//! Headless shot runner
//!
//! Each shot gets its own quiet `ShotSession`, so shots are independent and can
//! run on any thread.

use bevy::prelude::*;
use rand::Rng;

use crate::ball::BallState;
use crate::history::{SessionSummary, ShotHistory, ShotRow};
use crate::session::{ShotPhase, ShotSession};
use crate::shooting::ShotPower;
use crate::tuning::{GAMEPLAY_TUNING_FILE, PhysicsTweaks, load_tuning_from_file};
use crate::world::{CourtGeometry, Side};

use super::config::{SimConfig, SimMode};
use super::metrics::SimSummary;
use super::parallel::{init_parallel, random_specs, run_shots_parallel, spot_specs};

/// Give up on a shot that has not settled after this many ticks (30 s)
pub const MAX_SHOT_TICKS: u32 = 60 * 30;

/// Where a simulated shot is taken from and how hard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotSpec {
    pub origin: Vec3,
    pub power: u8,
}

/// What happened to a simulated shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotOutcome {
    pub spec: ShotSpec,
    pub side: Side,
    pub speed: f32,
    pub angle: f32,
    pub feasible: bool,
    pub made: bool,
    /// False if the ball was still moving at MAX_SHOT_TICKS
    pub resolved: bool,
    pub ticks: u32,
}

impl ShotOutcome {
    pub fn to_row(&self) -> ShotRow {
        ShotRow {
            side: self.side,
            origin: self.spec.origin,
            power: self.spec.power,
            speed: self.speed,
            angle: self.angle,
            feasible: self.feasible,
            made: self.made,
            flight_ticks: self.ticks as u64,
        }
    }
}

/// Fire one shot and run it until the ball settles
pub fn simulate_shot(spec: ShotSpec, court: &CourtGeometry, tweaks: &PhysicsTweaks) -> ShotOutcome {
    let mut session = ShotSession::new(court.clone(), tweaks.clone())
        .quiet()
        .with_ball(BallState::at_rest(spec.origin))
        .with_power(ShotPower::new(spec.power));
    let side = session.target_side();
    session.shoot();
    let ticks = session.run_until_resolved(MAX_SHOT_TICKS);

    let launch = session.last_launch();
    ShotOutcome {
        spec,
        side,
        speed: launch.map(|l| l.velocity.length()).unwrap_or(0.0),
        angle: launch.map(|l| l.angle).unwrap_or(0.0),
        feasible: launch.is_some_and(|l| l.feasible),
        made: session.ball().scored_this_flight,
        resolved: matches!(session.phase(), ShotPhase::Resolved { .. }),
        ticks,
    }
}

fn load_tweaks(config: &SimConfig) -> PhysicsTweaks {
    let path = config.tuning_file.as_deref().unwrap_or(GAMEPLAY_TUNING_FILE);
    match load_tuning_from_file(path) {
        Ok(tweaks) => tweaks,
        Err(e) => {
            if !config.quiet {
                eprintln!("Warning: {}, using default tuning", e);
            }
            PhysicsTweaks::default()
        }
    }
}

/// Run a simulation from CLI config: fire, summarize, optionally store
pub fn run_simulation(config: SimConfig) {
    let tweaks = load_tweaks(&config);
    let court = CourtGeometry::standard();
    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().r#gen());

    let specs = match config.mode {
        SimMode::Random { shots } => random_specs(shots as usize, seed, &court),
        SimMode::Spot { x, z, rounds } => {
            spot_specs(Vec3::new(x, court.ready_y, z), rounds, &court)
        }
    };

    if !config.quiet {
        println!(
            "Simulating {} shots (seed {}, {} threads)",
            specs.len(),
            seed,
            if config.parallel == 0 {
                "1".to_string()
            } else {
                config.parallel.to_string()
            }
        );
    }

    let outcomes = if config.parallel > 0 {
        init_parallel(config.parallel);
        run_shots_parallel(&specs, &court, &tweaks)
    } else {
        specs
            .iter()
            .map(|spec| simulate_shot(*spec, &court, &tweaks))
            .collect()
    };

    let summary = SimSummary::from_outcomes(&outcomes);

    if let Some(db_path) = &config.db_path {
        match store_outcomes(db_path, &config, &outcomes) {
            Ok(stored) => {
                if !config.quiet {
                    println!("Stored {} shots in {}", outcomes.len(), db_path);
                    stored.print();
                }
            }
            Err(e) => eprintln!("Failed to store shots in {}: {}", db_path, e),
        }
    }

    match &config.output_file {
        Some(path) => match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    eprintln!("Failed to write {}: {}", path, e);
                } else if !config.quiet {
                    println!("Summary written to {}", path);
                }
            }
            Err(e) => eprintln!("Failed to serialize summary: {}", e),
        },
        None => summary.print(),
    }
}

/// What the database holds after a run was stored
struct StoredRun {
    session: SessionSummary,
    /// (power, shots, made) over every session in the database
    by_power: Vec<(u8, u32, u32)>,
}

impl StoredRun {
    fn print(&self) {
        println!("{}", self.session.describe());
        println!("\nAll stored sessions by power:");
        println!("{:>6} {:>7} {:>7} {:>8}", "Power", "Shots", "Made", "Rate");
        for (power, shots, made) in &self.by_power {
            let rate = if *shots == 0 {
                0.0
            } else {
                *made as f64 / *shots as f64 * 100.0
            };
            println!("{:>5}% {:>7} {:>7} {:>7.1}%", power, shots, made, rate);
        }
    }
}

fn store_outcomes(
    db_path: &str,
    config: &SimConfig,
    outcomes: &[ShotOutcome],
) -> rusqlite::Result<StoredRun> {
    let mut db = ShotHistory::open(std::path::Path::new(db_path))?;
    let config_json = serde_json::to_string(config).ok();
    let session_id = db.create_session("simulate", config_json.as_deref())?;
    let rows: Vec<ShotRow> = outcomes.iter().map(ShotOutcome::to_row).collect();
    db.insert_shots(&session_id, &rows)?;
    Ok(StoredRun {
        session: db.session_summary(&session_id)?,
        by_power: db.make_rate_by_power()?,
    })
}

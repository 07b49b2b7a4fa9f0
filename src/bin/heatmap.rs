//! Court heatmap generator
//!
//! Sweeps a grid over the court and, for each cell, fires one shot at every
//! selectable power. The cell value is the fraction of those shots that score.
//!
//! Usage:
//!   cargo run --bin heatmap
//!   cargo run --bin heatmap -- --cols 120 --rows 60 --power-step 10
//!   cargo run --bin heatmap -- --tuning config/gameplay_tuning.json --output showcase/heatmaps/alt
//!
//! Writes <output>.png (top-down view, +X to the right, -Z at the top) and
//! <output>.txt (x,z,value per cell).

use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

use hoopshot::simulation::{HeatmapGrid, cell_center, init_parallel, run_heatmap_parallel};
use hoopshot::tuning::{PhysicsTweaks, load_tuning_from_file};
use hoopshot::{CourtGeometry, POWER_STEP};
use image::{Rgb, RgbImage};

// Grid settings
const CELL_SIZE: u32 = 10; // pixels per cell
const DEFAULT_COLS: usize = 90;
const DEFAULT_ROWS: usize = 45;
const DEFAULT_OUTPUT: &str = "showcase/heatmaps/heatmap_court";

struct HeatmapConfig {
    cols: usize,
    rows: usize,
    power_step: u8,
    tuning_file: Option<String>,
    output: String,
    threads: usize,
}

fn print_help() {
    println!("Usage: heatmap [options]");
    println!();
    println!("Options:");
    println!("  --cols <n>          Grid columns along X (default {})", DEFAULT_COLS);
    println!("  --rows <n>          Grid rows along Z (default {})", DEFAULT_ROWS);
    println!("  --power-step <n>    Power increment between shots (default {})", POWER_STEP);
    println!("  --tuning <path>     Tuning JSON to use instead of defaults");
    println!("  --output <prefix>   Output path without extension (default {})", DEFAULT_OUTPUT);
    println!("  --parallel <n>      Worker threads (0 = auto)");
    println!("  -h, --help          Show this help");
}

fn parse_args() -> HeatmapConfig {
    let mut config = HeatmapConfig {
        cols: DEFAULT_COLS,
        rows: DEFAULT_ROWS,
        power_step: POWER_STEP,
        tuning_file: None,
        output: DEFAULT_OUTPUT.to_string(),
        threads: 0,
    };
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--cols" => {
                if let Some(v) = args.next().and_then(|s| s.parse().ok()) {
                    config.cols = v;
                }
            }
            "--rows" => {
                if let Some(v) = args.next().and_then(|s| s.parse().ok()) {
                    config.rows = v;
                }
            }
            "--power-step" => {
                if let Some(v) = args.next().and_then(|s| s.parse().ok()) {
                    config.power_step = v;
                }
            }
            "--tuning" => config.tuning_file = args.next(),
            "--output" => {
                if let Some(v) = args.next() {
                    config.output = v;
                }
            }
            "--parallel" => {
                if let Some(v) = args.next().and_then(|s| s.parse().ok()) {
                    config.threads = v;
                }
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => eprintln!("Warning: ignoring unknown argument '{}'", other),
        }
    }

    config.cols = config.cols.max(1);
    config.rows = config.rows.max(1);
    config
}

/// Convert score percentage (0-1) to RGB color
/// Low score = red, high score = green
fn score_to_color(pct: f32) -> Rgb<u8> {
    // Red -> Yellow -> Green gradient
    let r = ((1.0 - pct) * 2.0).min(1.0);
    let g = (pct * 2.0).min(1.0);
    Rgb([(r * 255.0) as u8, (g * 255.0) as u8, 50])
}

/// Fill a cell with a solid color
fn fill_cell(img: &mut RgbImage, cx: u32, cy: u32, color: Rgb<u8>) {
    let x_start = cx * CELL_SIZE;
    let y_start = cy * CELL_SIZE;

    for dy in 0..CELL_SIZE {
        for dx in 0..CELL_SIZE {
            img.put_pixel(x_start + dx, y_start + dy, color);
        }
    }
}

fn render(grid: &HeatmapGrid) -> RgbImage {
    let mut img = RgbImage::new(grid.cols as u32 * CELL_SIZE, grid.rows as u32 * CELL_SIZE);
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            fill_cell(&mut img, col as u32, row as u32, score_to_color(grid.get(col, row)));
        }
    }
    img
}

fn text_dump(grid: &HeatmapGrid, court: &CourtGeometry) -> String {
    let mut out = String::from("x,z,value\n");
    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let center = cell_center(court, grid.cols, grid.rows, col, row);
            let _ = writeln!(out, "{:.2},{:.2},{:.3}", center.x, center.z, grid.get(col, row));
        }
    }
    out
}

fn main() {
    let config = parse_args();

    let tweaks = match &config.tuning_file {
        Some(path) => match load_tuning_from_file(path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Warning: {}, using default tuning", e);
                PhysicsTweaks::default()
            }
        },
        None => PhysicsTweaks::default(),
    };
    let court = CourtGeometry::standard();
    init_parallel(config.threads);

    println!(
        "Heatmap: {}x{} cells, power step {}",
        config.cols, config.rows, config.power_step
    );
    let grid = run_heatmap_parallel(&court, &tweaks, config.cols, config.rows, config.power_step);

    let best = grid.values.iter().cloned().fold(0.0_f32, f32::max);
    let mean = grid.values.iter().sum::<f32>() / grid.values.len() as f32;
    println!("Mean make fraction {:.3}, best cell {:.3}", mean, best);

    if let Some(parent) = Path::new(&config.output).parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = fs::create_dir_all(parent)
    {
        eprintln!("Failed to create {}: {}", parent.display(), e);
        std::process::exit(1);
    }

    let png_path = format!("{}.png", config.output);
    if let Err(e) = render(&grid).save(&png_path) {
        eprintln!("Failed to write {}: {}", png_path, e);
        std::process::exit(1);
    }
    println!("Wrote {}", png_path);

    let txt_path = format!("{}.txt", config.output);
    if let Err(e) = fs::write(&txt_path, text_dump(&grid, &court)) {
        eprintln!("Failed to write {}: {}", txt_path, e);
        std::process::exit(1);
    }
    println!("Wrote {}", txt_path);
}

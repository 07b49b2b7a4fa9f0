//! Hoopshot - a 3D basketball shooting game built with Bevy
//!
//! Main entry point: app setup and system registration.

use std::path::Path;

use bevy::prelude::*;
use hoopshot::{
    ActiveSession, ConfigWatcher, CourtGeometry, CurrentRecords, GameEvent, HistoryRecorder,
    SessionEvents, ShotFeedback, ShotInputQueue, ShotSession, config_watcher, constants::*, history,
    input, records, save_records_system, session, tuning, ui, world,
};

const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 720;

fn print_help() {
    println!("Usage: hoopshot [options]");
    println!();
    println!("Options:");
    println!("  --no-history   Do not record shots to {}", HISTORY_DB_FILE);
    println!("  -h, --help     Show this help");
    println!();
    println!("Controls: arrows move, W/S power, Space shoot, R reset");
}

fn main() {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_help();
        return;
    }
    let record_history = !args.iter().any(|a| a == "--no-history");

    // Load tuning (defaults if the file is missing or broken)
    let tweaks = tuning::load_global_tuning();

    // Load persistent records (uses defaults if file doesn't exist)
    let current_records = CurrentRecords::loaded();

    let court = CourtGeometry::standard();
    let mut shot_session = ShotSession::new(court.clone(), tweaks.clone()).with_records(
        current_records.records.high_score,
        current_records.records.best_streak,
    );

    let recorder = if record_history {
        match HistoryRecorder::open(Path::new(HISTORY_DB_FILE)) {
            Ok(recorder) => {
                info!("Recording shots to {} (session {})", HISTORY_DB_FILE, recorder.session_id());
                shot_session.events_mut().emit(GameEvent::SessionStart {
                    session_id: recorder.session_id().to_string(),
                    timestamp: chrono::Utc::now().to_rfc3339(),
                });
                Some(recorder)
            }
            Err(e) => {
                warn!("Failed to open shot history: {}", e);
                None
            }
        }
    } else {
        None
    };

    let mut app = App::new();
    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            resolution: bevy::window::WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT),
            title: "Hoopshot".into(),
            ..default()
        }),
        ..default()
    }))
    .insert_resource(ClearColor(BACKGROUND_COLOR))
    .insert_resource(Time::<Fixed>::from_seconds(tweaks.time_step as f64))
    .insert_resource(tweaks)
    .insert_resource(court)
    .insert_resource(current_records)
    .insert_resource(ActiveSession(shot_session))
    .init_resource::<SessionEvents>()
    .init_resource::<ShotInputQueue>()
    .init_resource::<ShotFeedback>()
    .init_resource::<ConfigWatcher>()
    .add_systems(Startup, setup)
    // Input is captured every frame and applied on the next fixed tick
    .add_systems(
        Update,
        (input::capture_input, config_watcher::check_config_changes),
    )
    .add_systems(
        FixedUpdate,
        (session::apply_queued_inputs, session::step_session).chain(),
    )
    // Event readers run in order, then the frame's events are cleared
    .add_systems(
        Update,
        (
            session::log_session_events,
            records::track_records,
            save_records_system,
            history::record_history,
            ui::trigger_feedback,
            ui::trigger_rim_glow,
            session::clear_session_events,
        )
            .chain(),
    )
    .add_systems(
        Update,
        (
            session::sync_ball_transform,
            ui::update_hud,
            ui::update_feedback_text,
            ui::animate_rim_glow,
            ui::draw_trajectory_preview,
        ),
    );

    if let Some(recorder) = recorder {
        app.insert_resource(recorder)
            .add_systems(Last, history::log_history_on_exit);
    }

    app.run();
}

/// Setup the game world
fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    court: Res<CourtGeometry>,
    active: Res<ActiveSession>,
) {
    // Camera - high along the sideline, looking across center court
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 9.0, 21.0).looking_at(Vec3::new(0.0, 1.5, 0.0), Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(6.0, 14.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    world::spawn_court(&mut commands, &mut meshes, &mut materials, &court);
    world::spawn_ball(
        &mut commands,
        &mut meshes,
        &mut materials,
        active.ball().position,
    );

    ui::spawn_hud(&mut commands);
    ui::spawn_feedback_text(&mut commands);
}

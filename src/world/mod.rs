//! World: court geometry for the physics core, plus the 3D scene that shows it

mod geometry;

pub use geometry::*;

use bevy::prelude::*;

use crate::ball::Ball;
use crate::constants::*;

/// Marks the rim mesh of one hoop
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RimMarker(pub Side);

/// Marks the wooden floor
#[derive(Component)]
pub struct CourtFloor;

/// Extra floor past each backboard so the hoops do not overhang the edge
const FLOOR_MARGIN: f32 = 3.0;
const POLE_RADIUS: f32 = 0.08;
/// Gap between the back of the board and its pole
const POLE_GAP: f32 = 0.6;

/// Spawn the floor and both hoops for `court`
pub fn spawn_court(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    court: &CourtGeometry,
) {
    let floor_width = 2.0 * (HOOP_X + FLOOR_MARGIN);
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(floor_width, COURT_TOP_Y, COURT_LENGTH))),
        MeshMaterial3d(materials.add(FLOOR_COLOR)),
        Transform::from_xyz(0.0, COURT_TOP_Y / 2.0, 0.0),
        CourtFloor,
    ));

    for hoop in &court.hoops {
        spawn_hoop(commands, meshes, materials, hoop);
    }
}

/// Backboard, pole and rim for one hoop
pub fn spawn_hoop(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    hoop: &Hoop,
) {
    let board = hoop.backboard;
    let board_height = board.top - board.bottom;
    // Board extends away from the court behind its front face
    let board_x = board.plane_x - board.facing * BACKBOARD_THICKNESS / 2.0;
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(BACKBOARD_THICKNESS, board_height, board.half_width * 2.0))),
        MeshMaterial3d(materials.add(BACKBOARD_COLOR)),
        Transform::from_xyz(board_x, board.bottom + board_height / 2.0, board.center_z),
    ));

    let pole_x = board.plane_x - board.facing * (BACKBOARD_THICKNESS + POLE_GAP);
    commands.spawn((
        Mesh3d(meshes.add(Cylinder::new(POLE_RADIUS, board.top))),
        MeshMaterial3d(materials.add(BACKBOARD_COLOR)),
        Transform::from_xyz(pole_x, board.top / 2.0, board.center_z),
    ));

    // Torus lies flat in XZ, matching the scoring plane
    commands.spawn((
        Mesh3d(meshes.add(Torus {
            minor_radius: hoop.rim.thickness,
            major_radius: hoop.rim.radius,
        })),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: RIM_COLOR,
            emissive: LinearRgba::from(RIM_COLOR) * 0.3,
            ..default()
        })),
        Transform::from_translation(hoop.rim.center),
        RimMarker(hoop.side),
    ));
}

/// Spawn the ball mesh at `position`
pub fn spawn_ball(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    position: Vec3,
) {
    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(BALL_RADIUS).mesh().uv(32, 18))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: BALL_COLOR,
            perceptual_roughness: 0.8,
            ..default()
        })),
        Transform::from_translation(position),
        Ball,
    ));
}

//! Tunable constants for hoopshot
//!
//! Court geometry and default physics values live here. All distances are meters,
//! velocities m/s. The court's long axis is X, the short axis Z, Y is up.

use bevy::prelude::*;

// =============================================================================
// ARENA COLORS
// =============================================================================

pub const BACKGROUND_COLOR: Color = Color::srgb(0.05, 0.08, 0.16);
pub const FLOOR_COLOR: Color = Color::srgb(0.78, 0.55, 0.3);
pub const BACKBOARD_COLOR: Color = Color::srgb(0.92, 0.94, 0.97);
pub const RIM_COLOR: Color = Color::srgb(1.0, 0.65, 0.0);
pub const BALL_COLOR: Color = Color::srgb(0.93, 0.45, 0.1);
pub const PREVIEW_COLOR: Color = Color::srgb(0.0, 1.0, 0.8);

pub const TEXT_PRIMARY: Color = Color::srgb(0.95, 0.95, 0.98);
pub const TEXT_MADE: Color = Color::srgb(0.12, 0.79, 0.0);
pub const TEXT_MISSED: Color = Color::srgb(0.96, 0.26, 0.21);

// =============================================================================
// BALL
// =============================================================================

pub const BALL_RADIUS: f32 = 0.12;
pub const COURT_TOP_Y: f32 = 0.1; // Top surface of the wooden floor
pub const GROUND_Y: f32 = COURT_TOP_Y + BALL_RADIUS; // Ball center when touching the floor
pub const READY_Y: f32 = GROUND_Y + 0.48; // Ball center while waiting to shoot (0.7)
pub const BALL_SPAWN: Vec3 = Vec3::new(0.0, READY_Y, 0.0);

// =============================================================================
// COURT
// =============================================================================

pub const COURT_WIDTH: f32 = 30.0; // Along X
pub const COURT_LENGTH: f32 = 15.0; // Along Z
pub const RELIEF_ZONE: f32 = 2.5; // Distance from a hoop where side walls let the ball through

// =============================================================================
// HOOPS
// =============================================================================

pub const HOOP_X: f32 = 16.0; // Backboard face distance from center court
pub const RIM_HEIGHT: f32 = 2.825;
pub const RIM_RADIUS: f32 = 0.225;
pub const RIM_THICKNESS: f32 = 0.018;
pub const BACKBOARD_THICKNESS: f32 = 0.1;
pub const BACKBOARD_WIDTH: f32 = 1.8;
pub const BACKBOARD_BOTTOM: f32 = 2.6;
pub const BACKBOARD_TOP: f32 = 3.65;
/// Rim center distance in front of the backboard plane
pub const RIM_OFFSET: f32 = BACKBOARD_THICKNESS / 2.0 + RIM_RADIUS + 0.01;

// =============================================================================
// PHYSICS DEFAULTS
// =============================================================================

pub const GRAVITY: f32 = 9.8; // Magnitude, applied downward
pub const TIME_STEP: f32 = 1.0 / 60.0;
pub const GROUND_RESTITUTION: f32 = 0.65;
pub const GROUND_FRICTION: f32 = 0.85; // Horizontal velocity retained per floor bounce
pub const MIN_BOUNCE_VELOCITY: f32 = 1.2; // Impact speed below this puts the ball at rest
pub const RIM_RESTITUTION: f32 = 0.5;
pub const WALL_RESTITUTION: f32 = 0.7;
pub const BACKBOARD_RESTITUTION: f32 = 0.6;
pub const TANGENTIAL_DAMPING: f32 = 0.85; // Glancing loss on walls and backboard
pub const ROTATION_EPSILON: f32 = 0.01; // Below this speed the ball does not spin

// Contact shells (hand tuned, no physical derivation)
pub const RIM_CONTACT_BAND: f32 = BALL_RADIUS * 0.95 + RIM_THICKNESS * 0.8;
pub const BACKBOARD_CONTACT_INSET: f32 = BALL_RADIUS * 0.95;
pub const BACKBOARD_SLAB_DEPTH: f32 = 0.2;

// =============================================================================
// SCORING
// =============================================================================

pub const POINTS_PER_MAKE: u32 = 2;
pub const SCORE_RADIUS_TOLERANCE: f32 = 0.98; // Fraction of the rim radius that counts as clean
pub const SCORE_PLANE_EPSILON: f32 = 0.05; // Depth below the rim plane needed to count a crossing

// =============================================================================
// SHOOTING
// =============================================================================

pub const SHOT_MIN_SPEED: f32 = 7.5;
pub const SHOT_MAX_SPEED: f32 = 18.0;
pub const DEFAULT_POWER: u8 = 50;
pub const POWER_STEP: u8 = 5;
pub const MOVE_STEP: f32 = 0.3;
pub const FALLBACK_LAUNCH_ANGLE: f32 = std::f32::consts::FRAC_PI_4;
pub const PREVIEW_SEGMENTS: usize = 40;

// =============================================================================
// FEEDBACK (cosmetic, outside the physics core)
// =============================================================================

pub const FEEDBACK_DURATION: f32 = 1.5;
pub const RIM_GLOW_DURATION: f32 = 0.3;
pub const RIM_GLOW_SCALE: f32 = 0.35;

// =============================================================================
// FILES
// =============================================================================

pub const RECORDS_FILE: &str = "config/records.json";
pub const HISTORY_DB_FILE: &str = "db/shots.db";

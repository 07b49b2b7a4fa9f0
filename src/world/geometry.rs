//! Static court geometry: bounds, rims and backboards for both hoops

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Which end of the court a hoop sits on
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// Sign of this side's X coordinates (-1 left, +1 right)
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    /// Side of center court a position is on. Center itself counts as right.
    pub fn of_x(x: f32) -> Self {
        if x < 0.0 { Side::Left } else { Side::Right }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Horizontal ring the ball scores through
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RimTarget {
    pub center: Vec3,
    pub radius: f32,
    pub thickness: f32,
    pub plane_y: f32,
}

impl RimTarget {
    /// Distance from the rim center in the horizontal (XZ) plane
    pub fn horizontal_distance(&self, point: Vec3) -> f32 {
        horizontal(point - self.center).length()
    }
}

/// Vertical board behind a rim. `plane_x` is the court-facing surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backboard {
    pub plane_x: f32,
    /// +1 when the court is toward +X from the board, -1 otherwise
    pub facing: f32,
    pub bottom: f32,
    pub top: f32,
    pub center_z: f32,
    pub half_width: f32,
}

/// One hoop: rim plus the backboard behind it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hoop {
    pub side: Side,
    pub rim: RimTarget,
    pub backboard: Backboard,
}

impl Hoop {
    pub fn standard(side: Side) -> Self {
        let s = side.sign();
        let plane_x = s * HOOP_X;
        Self {
            side,
            rim: RimTarget {
                center: Vec3::new(plane_x - s * RIM_OFFSET, RIM_HEIGHT, 0.0),
                radius: RIM_RADIUS,
                thickness: RIM_THICKNESS,
                plane_y: RIM_HEIGHT,
            },
            backboard: Backboard {
                plane_x,
                facing: -s,
                bottom: BACKBOARD_BOTTOM,
                top: BACKBOARD_TOP,
                center_z: 0.0,
                half_width: BACKBOARD_WIDTH / 2.0,
            },
        }
    }
}

/// Axis-aligned playable rectangle for the ball center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourtBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl CourtBounds {
    /// Court rectangle shrunk by the ball radius so the ball surface stays inside
    pub fn for_ball(width: f32, length: f32, ball_radius: f32) -> Self {
        Self {
            min_x: -width / 2.0 + ball_radius,
            max_x: width / 2.0 - ball_radius,
            min_z: -length / 2.0 + ball_radius,
            max_z: length / 2.0 - ball_radius,
        }
    }

    /// Clamp a position's X/Z into the rectangle, leaving Y alone
    pub fn clamp(&self, position: Vec3) -> Vec3 {
        Vec3::new(
            position.x.clamp(self.min_x, self.max_x),
            position.y,
            position.z.clamp(self.min_z, self.max_z),
        )
    }

    pub fn contains(&self, position: Vec3) -> bool {
        (self.min_x..=self.max_x).contains(&position.x)
            && (self.min_z..=self.max_z).contains(&position.z)
    }
}

/// Everything the physics core needs to know about the court
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct CourtGeometry {
    pub bounds: CourtBounds,
    /// Ordered left, right
    pub hoops: [Hoop; 2],
    pub ball_radius: f32,
    pub ground_y: f32,
    pub ready_y: f32,
}

impl Default for CourtGeometry {
    fn default() -> Self {
        Self::standard()
    }
}

impl CourtGeometry {
    pub fn standard() -> Self {
        Self {
            bounds: CourtBounds::for_ball(COURT_WIDTH, COURT_LENGTH, BALL_RADIUS),
            hoops: [Hoop::standard(Side::Left), Hoop::standard(Side::Right)],
            ball_radius: BALL_RADIUS,
            ground_y: GROUND_Y,
            ready_y: READY_Y,
        }
    }

    pub fn hoop(&self, side: Side) -> &Hoop {
        match side {
            Side::Left => &self.hoops[0],
            Side::Right => &self.hoops[1],
        }
    }

    /// Hoop on the same half of the court as `position`
    pub fn nearest_hoop(&self, position: Vec3) -> &Hoop {
        self.hoop(Side::of_x(position.x))
    }

    /// Center-court resting position used by resets
    pub fn center_spot(&self) -> Vec3 {
        Vec3::new(0.0, self.ready_y, 0.0)
    }
}

/// Drop the vertical component
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

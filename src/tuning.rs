//! Global gameplay tuning settings (decoupled from UI)

use bevy::log::warn;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Path to global gameplay tuning config
pub const GAMEPLAY_TUNING_FILE: &str = "config/gameplay_tuning.json";

/// Runtime-adjustable physics values. Any field missing from the config file keeps
/// its default, so old files keep loading as new knobs are added.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTweaks {
    pub gravity: f32,
    pub time_step: f32,
    pub ground_restitution: f32,
    pub ground_friction: f32,
    pub min_bounce_velocity: f32,
    pub rim_restitution: f32,
    pub wall_restitution: f32,
    pub backboard_restitution: f32,
    pub tangential_damping: f32,
    pub rotation_epsilon: f32,
    // Contact shells
    pub rim_contact_band: f32,
    pub backboard_contact_inset: f32,
    pub backboard_slab_depth: f32,
    pub relief_zone: f32,
    // Scoring
    pub score_radius_tolerance: f32,
    pub score_plane_epsilon: f32,
    // Shooting
    pub shot_min_speed: f32,
    pub shot_max_speed: f32,
    pub power_step: u8,
    pub move_step: f32,
}

impl Default for PhysicsTweaks {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            time_step: TIME_STEP,
            ground_restitution: GROUND_RESTITUTION,
            ground_friction: GROUND_FRICTION,
            min_bounce_velocity: MIN_BOUNCE_VELOCITY,
            rim_restitution: RIM_RESTITUTION,
            wall_restitution: WALL_RESTITUTION,
            backboard_restitution: BACKBOARD_RESTITUTION,
            tangential_damping: TANGENTIAL_DAMPING,
            rotation_epsilon: ROTATION_EPSILON,
            rim_contact_band: RIM_CONTACT_BAND,
            backboard_contact_inset: BACKBOARD_CONTACT_INSET,
            backboard_slab_depth: BACKBOARD_SLAB_DEPTH,
            relief_zone: RELIEF_ZONE,
            score_radius_tolerance: SCORE_RADIUS_TOLERANCE,
            score_plane_epsilon: SCORE_PLANE_EPSILON,
            shot_min_speed: SHOT_MIN_SPEED,
            shot_max_speed: SHOT_MAX_SPEED,
            power_step: POWER_STEP,
            move_step: MOVE_STEP,
        }
    }
}

impl PhysicsTweaks {
    /// Clamp values that would break the simulation (restitution above 1, zero dt).
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        for r in [
            &mut self.ground_restitution,
            &mut self.rim_restitution,
            &mut self.wall_restitution,
            &mut self.backboard_restitution,
            &mut self.tangential_damping,
            &mut self.ground_friction,
        ] {
            *r = r.clamp(0.0, 1.0);
        }
        if !(self.time_step > 0.0) {
            self.time_step = defaults.time_step;
        }
        if !(self.gravity > 0.0) {
            self.gravity = defaults.gravity;
        }
        self.score_radius_tolerance = self.score_radius_tolerance.clamp(0.0, 1.0);
        if self.shot_max_speed < self.shot_min_speed {
            std::mem::swap(&mut self.shot_max_speed, &mut self.shot_min_speed);
        }
        self
    }
}

pub fn load_tuning_from_file(path: &str) -> Result<PhysicsTweaks, String> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path, e))?;
    serde_json::from_str::<PhysicsTweaks>(&contents)
        .map(PhysicsTweaks::sanitized)
        .map_err(|e| format!("Failed to parse {}: {}", path, e))
}

pub fn apply_global_tuning(tweaks: &mut PhysicsTweaks) -> Result<(), String> {
    match load_tuning_from_file(GAMEPLAY_TUNING_FILE) {
        Ok(tuning) => {
            *tweaks = tuning;
            Ok(())
        }
        Err(err) => {
            *tweaks = PhysicsTweaks::default();
            Err(err)
        }
    }
}

/// Load tuning or fall back to defaults, warning on failure
pub fn load_global_tuning() -> PhysicsTweaks {
    let mut tweaks = PhysicsTweaks::default();
    if let Err(err) = apply_global_tuning(&mut tweaks) {
        warn!("{}, using default tuning", err);
    }
    tweaks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let tweaks: PhysicsTweaks = serde_json::from_str(r#"{ "gravity": 12.0 }"#).unwrap();
        assert_eq!(tweaks.gravity, 12.0);
        assert_eq!(tweaks.rim_restitution, RIM_RESTITUTION);
        assert_eq!(tweaks.power_step, POWER_STEP);
    }

    #[test]
    fn test_sanitize_clamps_restitution() {
        let tweaks = PhysicsTweaks {
            ground_restitution: 1.4,
            time_step: 0.0,
            shot_min_speed: 20.0,
            shot_max_speed: 5.0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(tweaks.ground_restitution, 1.0);
        assert_eq!(tweaks.time_step, TIME_STEP);
        assert_eq!(tweaks.shot_min_speed, 5.0);
        assert_eq!(tweaks.shot_max_speed, 20.0);
    }

    #[test]
    fn test_missing_file_is_error() {
        let err = load_tuning_from_file("config/does_not_exist.json").unwrap_err();
        assert!(err.contains("Failed to read"));
    }
}

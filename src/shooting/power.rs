//! Shot power: a 0-100 percentage mapped linearly onto launch speed

use bevy::prelude::*;

use crate::constants::DEFAULT_POWER;

/// Current shot power in percent, always within 0..=100
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotPower(u8);

impl Default for ShotPower {
    fn default() -> Self {
        Self(DEFAULT_POWER)
    }
}

impl ShotPower {
    pub const MAX: u8 = 100;

    pub fn new(percent: u8) -> Self {
        Self(percent.min(Self::MAX))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    pub fn increase(&mut self, step: u8) {
        self.0 = self.0.saturating_add(step).min(Self::MAX);
    }

    pub fn decrease(&mut self, step: u8) {
        self.0 = self.0.saturating_sub(step);
    }

    /// Launch speed: min at 0%, max at 100%
    pub fn launch_speed(self, min_speed: f32, max_speed: f32) -> f32 {
        min_speed + (max_speed - min_speed) * (self.0 as f32 / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{POWER_STEP, SHOT_MAX_SPEED, SHOT_MIN_SPEED};

    #[test]
    fn test_power_clamps() {
        let mut power = ShotPower::new(97);
        power.increase(POWER_STEP);
        assert_eq!(power.percent(), 100);
        power.increase(POWER_STEP);
        assert_eq!(power.percent(), 100);

        let mut power = ShotPower::new(3);
        power.decrease(POWER_STEP);
        assert_eq!(power.percent(), 0);
        assert_eq!(ShotPower::new(250).percent(), 100);
    }

    #[test]
    fn test_launch_speed_is_linear() {
        assert_eq!(ShotPower::new(0).launch_speed(SHOT_MIN_SPEED, SHOT_MAX_SPEED), 7.5);
        assert_eq!(ShotPower::new(100).launch_speed(SHOT_MIN_SPEED, SHOT_MAX_SPEED), 18.0);
        assert_eq!(ShotPower::new(50).launch_speed(SHOT_MIN_SPEED, SHOT_MAX_SPEED), 12.75);
        assert_eq!(ShotPower::default().percent(), 50);
    }
}

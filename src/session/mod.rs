//! Shot session - one possession at a time: ready, in flight, resolved
//!
//! `ShotSession` owns the ball, the scoreboard and the court, and is the only
//! thing that mutates them. The game loop feeds it inputs and calls `tick` at a
//! fixed rate; everything it wants the outside world to know goes out through
//! its event bus.

mod systems;

pub use systems::*;

use bevy::prelude::*;

use crate::ball::{BallState, integrate, resolve_collisions, rolling_rotation};
use crate::events::{BusEvent, EventBus, GameEvent};
use crate::scoring::{ScoreState, detect_score};
use crate::shooting::{LaunchSolution, ShotPower, preview_trajectory, solve_launch};
use crate::tuning::PhysicsTweaks;
use crate::world::{CourtGeometry, Side};

/// Where the current possession stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShotPhase {
    #[default]
    Ready,
    InFlight,
    /// Flight just ended. Becomes `Ready` on the next tick or input.
    Resolved { made: bool },
}

/// Discrete commands from the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShotInput {
    MoveLeft,
    MoveRight,
    /// Toward -Z
    MoveForward,
    /// Toward +Z
    MoveBack,
    IncreasePower,
    DecreasePower,
    Shoot,
    Reset,
}

impl ShotInput {
    /// Parse the names used in scenario files
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "move_left" => ShotInput::MoveLeft,
            "move_right" => ShotInput::MoveRight,
            "move_forward" => ShotInput::MoveForward,
            "move_back" => ShotInput::MoveBack,
            "power_up" => ShotInput::IncreasePower,
            "power_down" => ShotInput::DecreasePower,
            "shoot" => ShotInput::Shoot,
            "reset" => ShotInput::Reset,
            _ => return None,
        })
    }
}

/// The physics and scoring state for one player at one court
#[derive(Debug)]
pub struct ShotSession {
    ball: BallState,
    score: ScoreState,
    phase: ShotPhase,
    power: ShotPower,
    court: CourtGeometry,
    tweaks: PhysicsTweaks,
    bus: EventBus,
    /// Visual orientation accumulated from rolling, never read by physics
    orientation: Quat,
    tick: u64,
    last_launch: Option<LaunchSolution>,
}

impl Default for ShotSession {
    fn default() -> Self {
        Self::new(CourtGeometry::standard(), PhysicsTweaks::default())
    }
}

impl ShotSession {
    pub fn new(court: CourtGeometry, tweaks: PhysicsTweaks) -> Self {
        Self {
            ball: BallState::at_rest(court.center_spot()),
            score: ScoreState::default(),
            phase: ShotPhase::Ready,
            power: ShotPower::default(),
            court,
            tweaks,
            bus: EventBus::new(),
            orientation: Quat::IDENTITY,
            tick: 0,
            last_launch: None,
        }
    }

    /// Session seeded with saved high score and best streak
    pub fn with_records(mut self, high_score: u32, best_streak: u32) -> Self {
        self.score = ScoreState::with_records(high_score, best_streak);
        self
    }

    /// Session with the ball already placed (and possibly moving)
    pub fn with_ball(mut self, ball: BallState) -> Self {
        self.place_ball(ball);
        self
    }

    pub fn with_power(mut self, power: ShotPower) -> Self {
        self.power = power;
        self
    }

    /// Session that drops its events, for bulk simulation
    pub fn quiet(mut self) -> Self {
        self.bus.set_enabled(false);
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn ball(&self) -> &BallState {
        &self.ball
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn phase(&self) -> ShotPhase {
        self.phase
    }

    pub fn power(&self) -> ShotPower {
        self.power
    }

    pub fn court(&self) -> &CourtGeometry {
        &self.court
    }

    pub fn tweaks(&self) -> &PhysicsTweaks {
        &self.tweaks
    }

    pub fn orientation(&self) -> Quat {
        self.orientation
    }

    /// Solver output for the most recent shot
    pub fn last_launch(&self) -> Option<LaunchSolution> {
        self.last_launch
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Take everything emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<BusEvent> {
        self.bus.drain()
    }

    /// Swap in new tuning. Takes effect on the next tick.
    pub fn set_tweaks(&mut self, tweaks: PhysicsTweaks) {
        self.tweaks = tweaks;
    }

    /// Put the ball somewhere directly, e.g. mid-flight for a scripted scenario.
    /// The scoreboard is left alone.
    pub fn place_ball(&mut self, ball: BallState) {
        self.phase = if ball.in_flight {
            ShotPhase::InFlight
        } else {
            ShotPhase::Ready
        };
        self.ball = ball;
    }

    /// Hoop the next shot will target
    pub fn target_side(&self) -> Side {
        self.court.nearest_hoop(self.ball.position).side
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    pub fn handle_input(&mut self, input: ShotInput) {
        self.promote_resolved();
        match input {
            ShotInput::MoveLeft => self.move_ball(Vec3::NEG_X),
            ShotInput::MoveRight => self.move_ball(Vec3::X),
            ShotInput::MoveForward => self.move_ball(Vec3::NEG_Z),
            ShotInput::MoveBack => self.move_ball(Vec3::Z),
            ShotInput::IncreasePower => self.power.increase(self.tweaks.power_step),
            ShotInput::DecreasePower => self.power.decrease(self.tweaks.power_step),
            ShotInput::Shoot => self.shoot(),
            ShotInput::Reset => self.reset(),
        }
    }

    fn move_ball(&mut self, direction: Vec3) {
        if self.phase == ShotPhase::InFlight {
            return;
        }
        let moved = self.ball.position + direction * self.tweaks.move_step;
        let mut position = self.court.bounds.clamp(moved);
        position.y = self.court.ready_y;
        self.ball = BallState::at_rest(position);
    }

    /// Launch toward the rim on the ball's half of the court. Ignored in flight.
    pub fn shoot(&mut self) {
        if self.phase == ShotPhase::InFlight {
            return;
        }
        let mut origin = self.ball.position;
        origin.y = self.court.ready_y;

        let hoop = *self.court.nearest_hoop(origin);
        let speed = self
            .power
            .launch_speed(self.tweaks.shot_min_speed, self.tweaks.shot_max_speed);
        let solution = solve_launch(origin, hoop.rim.center, speed, self.tweaks.gravity);

        self.ball = BallState::launched(origin, solution.velocity);
        self.last_launch = Some(solution);
        self.score.shots_attempted += 1;
        self.phase = ShotPhase::InFlight;

        if solution.feasible {
            info!(
                "Shot at {} rim: power {}%, {:.1} m/s, {:.1} deg",
                hoop.side,
                self.power.percent(),
                speed,
                solution.angle.to_degrees()
            );
        } else {
            info!(
                "Shot at {} rim: power {}% ({:.1} m/s) cannot reach, using fallback angle",
                hoop.side,
                self.power.percent(),
                speed
            );
        }
        self.bus.emit(GameEvent::ShotAttempted {
            side: hoop.side,
            power: self.power.percent(),
            speed,
            angle: solution.angle,
            feasible: solution.feasible,
            origin,
        });
    }

    /// Ball back to center court, streak cleared. Works from any phase; a flight
    /// cut short still resolves with whatever it scored.
    pub fn reset(&mut self) {
        if self.phase == ShotPhase::InFlight {
            self.bus.emit(GameEvent::ShotResolved {
                made: self.ball.scored_this_flight,
            });
        }

        self.ball = BallState::at_rest(self.court.center_spot());
        self.phase = ShotPhase::Ready;
        if self.score.current_streak != 0 {
            self.score.current_streak = 0;
            self.bus.emit(GameEvent::StreakChanged {
                current: 0,
                best: self.score.best_streak,
            });
        }
        debug!("Ball reset to center court");
        self.bus.emit(GameEvent::BallReset);
    }

    // -------------------------------------------------------------------------
    // Simulation
    // -------------------------------------------------------------------------

    /// Advance one fixed step. Returns the rotation the ball picked up this tick
    /// for the renderer. Nothing moves unless the ball is in flight.
    pub fn tick(&mut self) -> Option<Quat> {
        self.promote_resolved();
        self.tick += 1;
        self.bus.set_tick(self.tick);
        if self.phase != ShotPhase::InFlight {
            return None;
        }

        let dt = self.tweaks.time_step;
        integrate(&mut self.ball, self.tweaks.gravity, dt);

        let rotation = rolling_rotation(
            self.ball.velocity,
            dt,
            self.court.ball_radius,
            self.tweaks.rotation_epsilon,
        );
        if let Some(delta) = rotation {
            self.orientation = (delta * self.orientation).normalize();
        }

        let report = resolve_collisions(&mut self.ball, &self.court, &self.tweaks);

        let hoops = self.court.hoops;
        for hoop in &hoops {
            if detect_score(&mut self.ball, &hoop.rim, &self.tweaks) {
                self.score_basket(hoop.side);
            }
        }

        if report.came_to_rest {
            self.resolve();
        }
        rotation
    }

    /// Run until the current flight resolves or `max_ticks` pass.
    /// Returns the number of ticks taken.
    pub fn run_until_resolved(&mut self, max_ticks: u32) -> u32 {
        let mut ticks = 0;
        while self.phase == ShotPhase::InFlight && ticks < max_ticks {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// Aiming guide toward the target rim. `None` while the ball is in the air.
    pub fn preview(&self) -> Option<Vec<Vec3>> {
        if self.phase == ShotPhase::InFlight {
            return None;
        }
        let mut origin = self.ball.position;
        origin.y = self.court.ready_y;
        let target = self.court.nearest_hoop(origin).rim.center;
        let speed = self
            .power
            .launch_speed(self.tweaks.shot_min_speed, self.tweaks.shot_max_speed);
        Some(preview_trajectory(
            origin,
            target,
            speed,
            self.tweaks.gravity,
            self.court.ground_y,
        ))
    }

    fn score_basket(&mut self, side: Side) {
        let beat_high_score = self.score.award_make();
        info!("Scored through the {} rim, score {}", side, self.score.score);
        self.bus.emit(GameEvent::ShotScored {
            side,
            score: self.score.score,
        });
        if beat_high_score {
            info!("New high score: {}", self.score.high_score);
            self.bus.emit(GameEvent::HighScoreChanged {
                value: self.score.high_score,
            });
        }
    }

    fn resolve(&mut self) {
        let made = self.ball.scored_this_flight;
        self.bus.emit(GameEvent::BallAtRest {
            position: self.ball.position,
        });

        let previous_streak = self.score.current_streak;
        let beat_best = self.score.record_outcome(made);
        info!(
            "Shot {} after {} attempts ({:.0}% made)",
            if made { "made" } else { "missed" },
            self.score.shots_attempted,
            self.score.accuracy()
        );
        self.bus.emit(GameEvent::ShotResolved { made });

        if self.score.current_streak != previous_streak {
            if beat_best {
                info!("New best streak: {}", self.score.best_streak);
            }
            self.bus.emit(GameEvent::StreakChanged {
                current: self.score.current_streak,
                best: self.score.best_streak,
            });
        }
        self.phase = ShotPhase::Resolved { made };
    }

    fn promote_resolved(&mut self) {
        if let ShotPhase::Resolved { .. } = self.phase {
            self.phase = ShotPhase::Ready;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::*;

    fn count(events: &[BusEvent], name: &str) -> usize {
        events.iter().filter(|e| e.event.name() == name).count()
    }

    fn drop_through_left_rim() -> BallState {
        let rim = CourtGeometry::standard().hoop(Side::Left).rim;
        BallState::launched(Vec3::new(rim.center.x, 2.86, 0.0), Vec3::new(0.0, -6.0, 0.0))
    }

    #[test]
    fn test_full_power_from_center_scores_once() {
        let mut session = ShotSession::default().with_power(ShotPower::new(100));
        session.handle_input(ShotInput::Shoot);
        assert_eq!(session.phase(), ShotPhase::InFlight);
        assert_eq!(session.score().shots_attempted, 1);

        let ticks = session.run_until_resolved(2000);
        assert!(ticks < 2000);
        assert_eq!(session.phase(), ShotPhase::Resolved { made: true });

        let score = session.score();
        assert_eq!(score.score, POINTS_PER_MAKE);
        assert_eq!(score.shots_made, 1);
        assert_eq!(score.current_streak, 1);
        assert_eq!(score.high_score, 2);

        let events = session.drain_events();
        assert_eq!(count(&events, "ShotAttempted"), 1);
        assert_eq!(count(&events, "ShotScored"), 1);
        assert_eq!(count(&events, "ShotResolved"), 1);
        assert!(events.iter().any(|e| e.event == GameEvent::ShotResolved { made: true }));
        assert!(events
            .iter()
            .any(|e| e.event == GameEvent::StreakChanged { current: 1, best: 1 }));
        assert!(events.iter().any(|e| e.event == GameEvent::HighScoreChanged { value: 2 }));
        assert!(matches!(
            events[0].event,
            GameEvent::ShotAttempted { side: Side::Right, power: 100, feasible: true, .. }
        ));
    }

    #[test]
    fn test_zero_power_from_center_lands_short_and_misses() {
        let mut session = ShotSession::default().with_power(ShotPower::new(0));
        session.shoot();

        let events = session.drain_events();
        match events[0].event {
            GameEvent::ShotAttempted { feasible, angle, speed, .. } => {
                assert!(!feasible);
                assert_eq!(angle, FALLBACK_LAUNCH_ANGLE);
                assert_eq!(speed, SHOT_MIN_SPEED);
            }
            ref other => panic!("Wrong event type: {:?}", other),
        }

        // First floor contact is well short of the rim
        let rim_x = session.court().hoop(Side::Right).rim.center.x;
        let mut guard = 0;
        while session.ball().position.y > GROUND_Y && guard < 600 {
            session.tick();
            guard += 1;
        }
        assert!(session.ball().position.x < rim_x - 5.0);

        session.run_until_resolved(2000);
        assert_eq!(session.phase(), ShotPhase::Resolved { made: false });
        assert_eq!(session.score().score, 0);

        let events = session.drain_events();
        assert_eq!(count(&events, "ShotScored"), 0);
        assert_eq!(count(&events, "ShotResolved"), 1);
        assert_eq!(count(&events, "BallAtRest"), 1);
        assert!(events.iter().any(|e| e.event == GameEvent::ShotResolved { made: false }));
    }

    #[test]
    fn test_drop_through_scores_once_per_flight() {
        let mut session = ShotSession::default().with_ball(drop_through_left_rim());
        session.tick();
        assert!(session.ball().scored_this_flight);
        assert_eq!(session.score().score, 2);
        // Still in flight until the ball settles
        assert_eq!(session.phase(), ShotPhase::InFlight);

        session.run_until_resolved(2000);
        assert_eq!(session.score().score, 2);
        let events = session.drain_events();
        assert_eq!(count(&events, "ShotScored"), 1);
        assert_eq!(count(&events, "ShotResolved"), 1);
    }

    #[test]
    fn test_streak_extends_and_breaks() {
        let mut session = ShotSession::default().with_records(10, 1);
        for _ in 0..2 {
            session.place_ball(drop_through_left_rim());
            session.run_until_resolved(2000);
        }
        assert_eq!(session.score().current_streak, 2);
        assert_eq!(session.score().best_streak, 2);
        assert_eq!(session.score().high_score, 10);

        session.place_ball(BallState::launched(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, -2.0, 0.0),
        ));
        session.run_until_resolved(2000);
        assert_eq!(session.phase(), ShotPhase::Resolved { made: false });
        assert_eq!(session.score().current_streak, 0);
        assert_eq!(session.score().best_streak, 2);

        let events = session.drain_events();
        assert!(events
            .iter()
            .any(|e| e.event == GameEvent::StreakChanged { current: 0, best: 2 }));
        assert_eq!(count(&events, "HighScoreChanged"), 0);
    }

    #[test]
    fn test_rest_is_idempotent() {
        let mut session = ShotSession::default().with_power(ShotPower::new(0));
        session.shoot();
        session.run_until_resolved(2000);
        session.drain_events();

        let settled = *session.ball();
        let orientation = session.orientation();
        for _ in 0..30 {
            assert!(session.tick().is_none());
        }
        assert_eq!(*session.ball(), settled);
        assert_eq!(session.orientation(), orientation);
        assert_eq!(session.phase(), ShotPhase::Ready);
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_flight_spins_the_ball() {
        let mut session = ShotSession::default().with_power(ShotPower::new(100));
        session.shoot();
        assert!(session.tick().is_some());
        assert_ne!(session.orientation(), Quat::IDENTITY);
    }

    #[test]
    fn test_movement_clamps_and_stays_at_ready_height() {
        let mut session = ShotSession::default();
        for _ in 0..100 {
            session.handle_input(ShotInput::MoveLeft);
            session.handle_input(ShotInput::MoveBack);
        }
        let bounds = session.court().bounds;
        let position = session.ball().position;
        assert_eq!(position.x, bounds.min_x);
        assert_eq!(position.z, bounds.max_z);
        assert_eq!(position.y, READY_Y);
        assert_eq!(session.target_side(), Side::Left);
    }

    #[test]
    fn test_inputs_ignored_in_flight() {
        let mut session = ShotSession::default();
        session.handle_input(ShotInput::Shoot);
        session.tick();
        let before = *session.ball();

        session.handle_input(ShotInput::MoveLeft);
        session.handle_input(ShotInput::MoveForward);
        session.handle_input(ShotInput::Shoot);
        assert_eq!(*session.ball(), before);
        assert_eq!(session.score().shots_attempted, 1);

        // Power still adjusts for the next shot
        session.handle_input(ShotInput::IncreasePower);
        assert_eq!(session.power().percent(), DEFAULT_POWER + POWER_STEP);
    }

    #[test]
    fn test_reset_mid_flight() {
        let mut session = ShotSession::default();
        session.place_ball(drop_through_left_rim());
        session.run_until_resolved(2000);
        assert_eq!(session.score().current_streak, 1);
        session.drain_events();

        session.handle_input(ShotInput::Shoot);
        for _ in 0..5 {
            session.tick();
        }
        session.handle_input(ShotInput::Reset);

        assert_eq!(session.phase(), ShotPhase::Ready);
        assert_eq!(*session.ball(), BallState::at_rest(Vec3::new(0.0, READY_Y, 0.0)));
        assert_eq!(session.score().current_streak, 0);
        assert_eq!(session.score().best_streak, 1);
        assert_eq!(session.score().score, 2);

        let names: Vec<_> = session.drain_events().iter().map(|e| e.event.name()).collect();
        assert_eq!(
            names,
            vec!["ShotAttempted", "ShotResolved", "StreakChanged", "BallReset"]
        );
    }

    #[test]
    fn test_resolved_becomes_ready() {
        let mut session = ShotSession::default().with_ball(drop_through_left_rim());
        session.run_until_resolved(2000);
        assert_eq!(session.phase(), ShotPhase::Resolved { made: true });

        session.handle_input(ShotInput::DecreasePower);
        assert_eq!(session.phase(), ShotPhase::Ready);
        assert_eq!(session.power().percent(), DEFAULT_POWER - POWER_STEP);
    }

    #[test]
    fn test_preview_only_while_ready() {
        let mut session = ShotSession::default();
        let preview = session.preview().unwrap();
        assert!(!preview.is_empty());
        assert_eq!(preview[0], session.ball().position);

        session.shoot();
        assert!(session.preview().is_none());
    }

    #[test]
    fn test_input_names() {
        assert_eq!(ShotInput::from_name("shoot"), Some(ShotInput::Shoot));
        assert_eq!(ShotInput::from_name("power_up"), Some(ShotInput::IncreasePower));
        assert_eq!(ShotInput::from_name("jump"), None);
    }
}

//! Player controller and lane state machine
//!
//! Lane changes are discrete (the logical lane jumps immediately) while the
//! rendered x eases toward the lane center over the following ticks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::GameEvent;
use super::scoring::{self, RunState};
use super::state::{Field, GameState, Lane};
use crate::consts::*;

/// Horizontal move request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Logical input consumed by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    Move(Direction),
    Boost,
}

/// The player's vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Authoritative logical position
    pub lane: Lane,
    pub target_lane: Lane,
    /// Eased horizontal pixel position
    pub x: f32,
    pub drifting: bool,
    pub drift_started_ms: f64,
    /// `None` until the first successful switch
    pub last_switch_ms: Option<f64>,
    pub perfect_switches: u32,
}

/// Outcome of an accepted lane change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneChange {
    pub from: Lane,
    pub to: Lane,
    pub perfect: bool,
}

impl Player {
    pub fn new(field: &Field) -> Self {
        Self {
            lane: Lane::MIDDLE,
            target_lane: Lane::MIDDLE,
            x: Lane::MIDDLE.center_x(field.lane_width()),
            drifting: false,
            drift_started_ms: 0.0,
            last_switch_ms: None,
            perfect_switches: 0,
        }
    }

    #[inline]
    pub fn target_x(&self, field: &Field) -> f32 {
        self.target_lane.center_x(field.lane_width())
    }

    /// Rendered car position on the vehicle row; effects spawn from here
    #[inline]
    pub fn car_pos(&self, field: &Field) -> Vec2 {
        Vec2::new(self.x, field.car_y())
    }

    /// Move the logical lane one step. Boundary moves return `None` and leave
    /// everything untouched.
    pub fn switch_lane(&mut self, run: RunState, direction: Direction, now_ms: f64) -> Option<(RunState, LaneChange)> {
        let from = self.lane;
        let to = match direction {
            Direction::Left => from.left(),
            Direction::Right => from.right(),
        }?;

        self.lane = to;
        self.target_lane = to;
        self.drifting = true;
        self.drift_started_ms = now_ms;

        let perfect = self.last_switch_ms.is_some_and(|last| {
            let since = now_ms - last;
            since > PERFECT_SWITCH_MIN_MS && since < PERFECT_SWITCH_MAX_MS
        });
        let run = if perfect {
            self.perfect_switches += 1;
            scoring::apply_perfect_switch(run)
        } else {
            self.perfect_switches = 0;
            run
        };
        self.last_switch_ms = Some(now_ms);

        Some((run, LaneChange { from, to, perfect }))
    }

    /// Per-tick presentation update: ease toward the lane and close the
    /// drift window.
    pub fn update(&mut self, now_ms: f64, field: &Field) {
        let target = self.target_x(field);
        self.x += (target - self.x) * LANE_EASING;

        if self.drifting && now_ms - self.drift_started_ms > DRIFT_WINDOW_MS {
            self.drifting = false;
        }
    }

    /// Tilt toward the direction of travel, only while drifting
    pub fn drift_angle(&self, field: &Field) -> f32 {
        if !self.drifting {
            return 0.0;
        }
        if self.target_x(field) > self.x {
            DRIFT_TILT
        } else {
            -DRIFT_TILT
        }
    }
}

/// Apply one queued input to the run, emitting effects and events
pub fn apply_input(state: &mut GameState, input: InputEvent, now_ms: f64, events: &mut Vec<GameEvent>) {
    match input {
        InputEvent::Move(direction) => {
            let car = state.player.car_pos(&state.field);
            let Some((run, change)) = state.player.switch_lane(state.run, direction, now_ms) else {
                return;
            };
            state.run = run;
            state.particles.drift_burst(car, -direction.sign(), &mut state.rng);
            if change.perfect {
                log::debug!(
                    "Perfect switch #{}! Multiplier: {:.2}",
                    state.player.perfect_switches,
                    state.run.multiplier
                );
            }
            events.push(GameEvent::LaneChanged {
                from: change.from,
                to: change.to,
                perfect: change.perfect,
            });
        }
        InputEvent::Boost => {
            if let Some(run) = scoring::activate_nitro(state.run, now_ms) {
                state.run = run;
                log::debug!("Nitro activated until {:.0}ms", now_ms + NITRO_DURATION_MS);
                events.push(GameEvent::NitroActivated);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field() -> Field {
        Field::new(390.0, 844.0)
    }

    #[test]
    fn test_boundary_moves_are_noops() {
        let mut player = Player::new(&field());
        let run = RunState::new();
        assert!(player.switch_lane(run, Direction::Left, 1000.0).is_some());
        assert_eq!(player.lane, Lane::LEFT);
        assert!(player.switch_lane(run, Direction::Left, 2000.0).is_none());
        assert_eq!(player.lane, Lane::LEFT);
        assert_eq!(player.last_switch_ms, Some(1000.0));
    }

    #[test]
    fn test_two_switches_300ms_apart_is_perfect() {
        let mut player = Player::new(&field());
        let run = RunState::new();
        let (run, first) = player.switch_lane(run, Direction::Left, 5000.0).unwrap();
        assert!(!first.perfect);
        assert_eq!(run.multiplier, 1.0);

        let (run, second) = player.switch_lane(run, Direction::Right, 5300.0).unwrap();
        assert!(second.perfect);
        assert_eq!(run.multiplier, 1.0 * PERFECT_SWITCH_FACTOR);
        assert_eq!(player.perfect_switches, 1);
    }

    #[test]
    fn test_switch_window_bounds_are_exclusive() {
        for (gap, expected) in [(100.0, false), (101.0, true), (999.0, true), (1000.0, false)] {
            let mut player = Player::new(&field());
            let run = RunState::new();
            let (run, _) = player.switch_lane(run, Direction::Left, 0.0).unwrap();
            let (_, change) = player.switch_lane(run, Direction::Right, gap).unwrap();
            assert_eq!(change.perfect, expected, "gap {gap}");
        }
    }

    #[test]
    fn test_slow_switch_resets_streak_without_touching_multiplier() {
        let mut player = Player::new(&field());
        let mut run = RunState::new();
        run = player.switch_lane(run, Direction::Left, 0.0).unwrap().0;
        run = player.switch_lane(run, Direction::Right, 500.0).unwrap().0;
        run = player.switch_lane(run, Direction::Right, 1000.0).unwrap().0;
        assert_eq!(player.perfect_switches, 2);
        let boosted = run.multiplier;

        run = player.switch_lane(run, Direction::Left, 5000.0).unwrap().0;
        assert_eq!(player.perfect_switches, 0);
        assert_eq!(run.multiplier, boosted);
    }

    #[test]
    fn test_drift_window_and_tilt() {
        let field = field();
        let mut player = Player::new(&field);
        player.switch_lane(RunState::new(), Direction::Right, 1000.0).unwrap();
        assert!(player.drifting);
        assert_eq!(player.drift_angle(&field), DRIFT_TILT);

        player.update(1150.0, &field);
        assert!(player.drifting);
        player.update(1201.0, &field);
        assert!(!player.drifting);
        assert_eq!(player.drift_angle(&field), 0.0);
    }

    #[test]
    fn test_new_switch_restarts_drift_window() {
        let field = field();
        let mut player = Player::new(&field);
        player.switch_lane(RunState::new(), Direction::Right, 1000.0).unwrap();
        player.switch_lane(RunState::new(), Direction::Left, 1150.0).unwrap();
        player.update(1300.0, &field);
        assert!(player.drifting);
    }

    #[test]
    fn test_position_eases_toward_lane() {
        let field = field();
        let mut player = Player::new(&field);
        player.switch_lane(RunState::new(), Direction::Left, 0.0).unwrap();
        let start = player.x;
        player.update(16.0, &field);
        let target = player.target_x(&field);
        assert!((player.x - (start + (target - start) * LANE_EASING)).abs() < 1e-4);
        for i in 0..120 {
            player.update(32.0 + i as f64 * 16.0, &field);
        }
        assert!((player.x - target).abs() < 0.01);
    }

    proptest! {
        #[test]
        fn prop_lane_stays_in_range(moves in prop::collection::vec((any::<bool>(), 0.0f64..2000.0), 0..300)) {
            let mut player = Player::new(&field());
            let mut run = RunState::new();
            let mut now = 0.0;
            for (left, gap) in moves {
                now += gap;
                let before = player.lane.index();
                let direction = if left { Direction::Left } else { Direction::Right };
                if let Some((next, change)) = player.switch_lane(run, direction, now) {
                    run = next;
                    prop_assert_eq!(before.abs_diff(change.to.index()), 1);
                } else {
                    prop_assert_eq!(player.lane.index(), before);
                }
                prop_assert!(player.lane.index() <= 2);
                prop_assert!(run.multiplier >= MULTIPLIER_MIN && run.multiplier <= MULTIPLIER_MAX);
            }
        }
    }
}

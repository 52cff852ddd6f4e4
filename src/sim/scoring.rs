//! Scoring and progression
//!
//! Speed ramp, odometer, multiplier and the nitro window. Every function here
//! takes a [`RunState`] by value and returns the updated copy.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// An active nitro boost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nitro {
    pub ends_at_ms: f64,
}

/// Per-run progression
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// Derived odometer, only ever grows
    pub distance: f32,
    /// Ambient speed (pixels per tick), ramps every tick
    pub base_speed: f32,
    /// Temporary nitro scale, 1.0 outside a boost
    pub speed_scale: f32,
    /// Score multiplier in [MULTIPLIER_MIN, MULTIPLIER_MAX]
    pub multiplier: f32,
    pub pickups: u32,
    pub nitro: Option<Nitro>,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState {
    pub fn new() -> Self {
        Self {
            distance: 0.0,
            base_speed: START_SPEED,
            speed_scale: 1.0,
            multiplier: MULTIPLIER_MIN,
            pickups: 0,
            nitro: None,
        }
    }

    /// Effective speed including any nitro scale
    #[inline]
    pub fn speed(&self) -> f32 {
        self.base_speed * self.speed_scale
    }

    /// Speed as shown to the player
    pub fn speed_kmh(&self) -> u32 {
        (self.speed() * HUD_SPEED_SCALE).floor() as u32
    }

    #[inline]
    pub fn nitro_active(&self) -> bool {
        self.nitro.is_some()
    }
}

/// Ramp the ambient speed and accumulate distance for one tick
pub fn advance_ramp(run: RunState) -> RunState {
    let ramped = RunState {
        base_speed: run.base_speed + SPEED_RAMP_PER_TICK,
        ..run
    };
    RunState {
        distance: ramped.distance + ramped.speed() / DISTANCE_DIVISOR,
        ..ramped
    }
}

/// Linear decay toward 1.0, proportional to elapsed seconds
pub fn decay_multiplier(run: RunState, dt: f32) -> RunState {
    if run.multiplier <= MULTIPLIER_MIN {
        return run;
    }
    RunState {
        multiplier: (run.multiplier - dt * MULTIPLIER_DECAY_PER_SEC).max(MULTIPLIER_MIN),
        ..run
    }
}

/// Reward a perfect lane switch
pub fn apply_perfect_switch(run: RunState) -> RunState {
    RunState {
        multiplier: (run.multiplier * PERFECT_SWITCH_FACTOR).min(MULTIPLIER_MAX),
        ..run
    }
}

/// Credit one pickup. Returns the updated state and the amount credited.
pub fn collect_pickup(run: RunState) -> (RunState, u32) {
    let value = (PICKUP_BASE_VALUE * run.multiplier).floor() as u32;
    let run = RunState {
        pickups: run.pickups + value,
        ..run
    };
    (run, value)
}

/// Start a boost. `None` if one is already running (no stacking).
pub fn activate_nitro(run: RunState, now_ms: f64) -> Option<RunState> {
    if run.nitro_active() {
        return None;
    }
    Some(RunState {
        speed_scale: run.speed_scale * NITRO_SPEED_FACTOR,
        nitro: Some(Nitro {
            ends_at_ms: now_ms + NITRO_DURATION_MS,
        }),
        ..run
    })
}

/// End the boost once its window has passed, undoing exactly the factor
/// applied on activation. The flag is true when the boost ended this call.
pub fn expire_nitro(run: RunState, now_ms: f64) -> (RunState, bool) {
    match run.nitro {
        Some(nitro) if now_ms > nitro.ends_at_ms => (
            RunState {
                speed_scale: run.speed_scale / NITRO_SPEED_FACTOR,
                nitro: None,
                ..run
            },
            true,
        ),
        _ => (run, false),
    }
}

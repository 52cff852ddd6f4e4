//! Single simulation step
//!
//! Runs every subsystem in a fixed order. Later steps read what earlier ones
//! wrote, so the order is part of the behaviour.

use super::collision::{self, Interaction};
use super::events::GameEvent;
use super::player::{self, InputEvent};
use super::scoring;
use super::spawner;
use super::state::GameState;
use crate::consts::*;

/// Inputs captured since the previous tick, in arrival order
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub events: Vec<InputEvent>,
}

impl TickInput {
    pub fn new(events: Vec<InputEvent>) -> Self {
        Self { events }
    }
}

/// What happened during one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
    /// The run ended this tick
    pub crashed: bool,
}

/// Advance the game by one frame.
///
/// `now_ms` is the host timestamp of this frame and `dt` the seconds since
/// the previous one. Position, speed and particle motion are per tick;
/// multiplier decay and particle ageing use `dt`; nitro, drift and switch
/// windows compare against `now_ms`.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64, dt: f32) -> TickReport {
    let mut report = TickReport::default();
    if state.is_over() {
        return report;
    }
    state.clock_ms = now_ms;

    // Inputs queued since the last frame
    for &event in &input.events {
        player::apply_input(state, event, now_ms, &mut report.events);
    }

    // 1. Speed ramp and odometer
    state.run = scoring::advance_ramp(state.run);

    // 2. Multiplier decay
    state.run = scoring::decay_multiplier(state.run, dt);

    // 3. Nitro expiry
    let (run, expired) = scoring::expire_nitro(state.run, now_ms);
    state.run = run;
    if expired {
        log::debug!("Nitro ended");
        report.events.push(GameEvent::NitroExpired);
    }

    // 4. Particles
    state.particles.advance(dt, &state.field, &mut state.rng);

    // 5. Spawn
    if let Some(index) = spawner::maybe_spawn(state, now_ms) {
        let entity = &state.entities[index];
        report.events.push(GameEvent::Spawned {
            id: entity.id,
            lane: entity.lane,
            kind: entity.kind,
        });
    }

    // 6. Move entities and resolve contacts; a crash ends the tick here
    let speed = state.run.speed();
    for index in 0..state.entities.len() {
        state.entities[index].advance(speed);
        if collision::resolve(state, index, &mut report.events) == Some(Interaction::Crash) {
            log::info!(
                "Game over at distance {:.0} with {} pickups",
                state.run.distance,
                state.run.pickups
            );
            report.crashed = true;
            return report;
        }
    }

    // 7. Drop taken gifts and anything past the bottom edge
    let despawn_y = state.field.despawn_y();
    state.entities.retain(|e| !e.collected && e.y <= despawn_y);

    // 8. Presentation: ease the car, close drift, continuous effects
    state.player.update(now_ms, &state.field);
    let car = state.player.car_pos(&state.field);
    if state.run.speed() > 0.0 {
        state.particles.trail(car, &mut state.rng);
    }
    if state.run.nitro_active() {
        state.particles.nitro_flames(car, &mut state.rng);
    }
    if now_ms - state.last_hum_ms >= ENGINE_HUM_INTERVAL_MS {
        state.last_hum_ms = now_ms;
        report.events.push(GameEvent::EngineHum {
            speed_kmh: state.run.speed_kmh(),
        });
    }

    report
}

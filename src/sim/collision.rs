//! Collision detection and interaction resolution
//!
//! An entity can only touch the player when it shares the player's lane.
//! After the lane gate, the player's box, centered on the logical lane, is
//! tested against the entity's vertical band probed at the entity's x. The
//! eased x is presentation only and never affects contact.

use glam::Vec2;

use super::events::GameEvent;
use super::scoring;
use super::state::{Entity, Field, GamePhase, GameState, Lane};
use crate::consts::*;

/// Axis-aligned box, open on all sides
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && other.min.x < self.max.x && self.min.y < other.max.y && other.min.y < self.max.y
    }
}

/// Player hit-box: fixed size, centered on the current lane, at the vehicle's row
pub fn player_hitbox(lane: Lane, field: &Field) -> Aabb {
    let center = lane.center_x(field.lane_width());
    let top = field.car_y();
    Aabb::new(
        Vec2::new(center - CAR_HITBOX_WIDTH / 2.0, top),
        Vec2::new(center + CAR_HITBOX_WIDTH / 2.0, top + CAR_HITBOX_HEIGHT),
    )
}

/// Entity hit-box: its full height, probed along the lane center line
pub fn entity_hitbox(entity: &Entity) -> Aabb {
    Aabb::new(
        Vec2::new(entity.x, entity.y),
        Vec2::new(entity.x, entity.y + ENTITY_SIZE),
    )
}

/// Lane gate followed by the box test
pub fn touches_player(entity: &Entity, state: &GameState) -> bool {
    entity.lane == state.player.lane
        && player_hitbox(state.player.lane, &state.field).overlaps(&entity_hitbox(entity))
}

/// Outcome of a player/entity contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Collect,
    Crash,
}

/// Test entity `index` against the player and apply the consequences.
///
/// Collected gifts are inert, so repeated overlapping frames credit a gift
/// once. A crash sets the phase to `GameOver`.
pub fn resolve(state: &mut GameState, index: usize, events: &mut Vec<GameEvent>) -> Option<Interaction> {
    let entity = &state.entities[index];
    if entity.collected || !touches_player(entity, state) {
        return None;
    }
    let (id, kind, at) = (entity.id, entity.kind, Vec2::new(entity.x, entity.y));

    if kind.is_pickup() {
        state.entities[index].collected = true;
        let (run, value) = scoring::collect_pickup(state.run);
        state.run = run;
        state.particles.pickup_burst(at);
        log::debug!(
            "Gift collected: {} (+{}) multiplier {:.2}",
            run.pickups,
            value,
            run.multiplier
        );
        events.push(GameEvent::PickupCollected {
            id,
            value,
            total: run.pickups,
        });
        return Some(Interaction::Collect);
    }

    let car = state.player.car_pos(&state.field);
    state.particles.crash_burst(car, at, &mut state.rng);
    state.phase = GamePhase::GameOver;
    log::info!("Crashed into {:?} #{}", kind, id);
    events.push(GameEvent::Crashed { id, kind });
    Some(Interaction::Crash)
}

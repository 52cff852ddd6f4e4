//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]; the step
//! functions in the sibling modules take it (or pieces of it) explicitly.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::particles::ParticleSystem;
use super::player::Player;
use super::scoring::RunState;
use crate::consts::*;

/// One of the three horizontal tracks.
///
/// Only 0, 1 and 2 are representable, so an out-of-range lane can never be
/// observed by the rest of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Lane(u8);

impl Lane {
    pub const LEFT: Lane = Lane(0);
    pub const MIDDLE: Lane = Lane(1);
    pub const RIGHT: Lane = Lane(2);
    pub const ALL: [Lane; LANE_COUNT as usize] = [Lane::LEFT, Lane::MIDDLE, Lane::RIGHT];

    pub fn new(index: u8) -> Option<Self> {
        (index < LANE_COUNT).then_some(Lane(index))
    }

    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    /// Neighbour to the left, `None` at the boundary
    pub fn left(self) -> Option<Self> {
        self.0.checked_sub(1).map(Lane)
    }

    /// Neighbour to the right, `None` at the boundary
    pub fn right(self) -> Option<Self> {
        Lane::new(self.0 + 1)
    }

    /// Horizontal pixel center of this lane
    #[inline]
    pub fn center_x(self, lane_width: f32) -> f32 {
        self.0 as f32 * lane_width + lane_width / 2.0
    }
}

impl TryFrom<u8> for Lane {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Lane::new(value).ok_or_else(|| format!("lane index {value} out of range"))
    }
}

impl From<Lane> for u8 {
    fn from(lane: Lane) -> u8 {
        lane.0
    }
}

/// Visible play area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn lane_width(&self) -> f32 {
        self.width / LANE_COUNT as f32
    }

    /// Top of the vehicle's row
    #[inline]
    pub fn car_y(&self) -> f32 {
        self.height - CAR_ROW_OFFSET
    }

    /// Entities below this line have left the field
    #[inline]
    pub fn despawn_y(&self) -> f32 {
        self.height + DESPAWN_MARGIN
    }
}

/// Entity kinds. `Gift` is the only pickup; the rest are hazards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Coal,
    Ice,
    Elf,
    Gift,
}

impl EntityKind {
    #[inline]
    pub fn is_pickup(self) -> bool {
        self == EntityKind::Gift
    }

    #[inline]
    pub fn is_hazard(self) -> bool {
        !self.is_pickup()
    }
}

/// An obstacle or pickup travelling down one lane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub lane: Lane,
    pub x: f32,
    /// Top edge; grows as the entity approaches the player's row
    pub y: f32,
    pub kind: EntityKind,
    /// Set once a pickup has been taken
    pub collected: bool,
    /// Spin phase in radians (pickups only)
    pub rotation: f32,
}

impl Entity {
    pub fn new(id: u32, lane: Lane, kind: EntityKind, field: &Field) -> Self {
        Self {
            id,
            lane,
            x: lane.center_x(field.lane_width()),
            y: SPAWN_Y,
            kind,
            collected: false,
            rotation: 0.0,
        }
    }

    /// Move toward the player by one tick's worth of travel
    pub fn advance(&mut self, speed: f32) {
        self.y += speed;
        if self.kind.is_pickup() && !self.collected {
            self.rotation += PICKUP_SPIN_PER_TICK;
        }
    }
}

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    /// Terminal: a hazard was hit
    GameOver,
}

/// Complete simulation state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Timestamp of the tick currently (or last) being simulated, in ms
    pub clock_ms: f64,
    pub last_spawn_ms: f64,
    pub last_hum_ms: f64,
    pub field: Field,
    pub phase: GamePhase,
    pub player: Player,
    pub run: RunState,
    /// Live entities in spawn order
    pub entities: Vec<Entity>,
    pub particles: ParticleSystem,
    next_id: u32,
}

impl GameState {
    /// Create a fresh run starting at `start_ms`.
    ///
    /// `effect_cap` bounds transient particles; `snow_count` ambient flakes
    /// are seeded immediately and live for the whole run.
    pub fn new(seed: u64, field: Field, effect_cap: usize, snow_count: usize, start_ms: f64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut particles = ParticleSystem::new(effect_cap);
        particles.seed_snow(snow_count, &field, &mut rng);

        Self {
            seed,
            rng,
            clock_ms: start_ms,
            last_spawn_ms: start_ms,
            last_hum_ms: start_ms,
            field,
            phase: GamePhase::Running,
            player: Player::new(&field),
            run: RunState::new(),
            entities: Vec::new(),
            particles,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Push a freshly built entity and return its id
    pub fn add_entity(&mut self, lane: Lane, kind: EntityKind) -> u32 {
        let id = self.next_entity_id();
        let entity = Entity::new(id, lane, kind, &self.field);
        self.entities.push(entity);
        id
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

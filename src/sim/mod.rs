//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of I/O:
//! - Time arrives as tick timestamps and deltas, never from a clock
//! - Seeded RNG only
//! - Stable iteration order (entities in spawn order)
//! - No rendering or audio dependencies

pub mod collision;
pub mod events;
pub mod particles;
pub mod player;
pub mod scoring;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Interaction};
pub use events::GameEvent;
pub use particles::{Particle, ParticleKind, ParticleSystem};
pub use player::{Direction, InputEvent, LaneChange, Player};
pub use scoring::{Nitro, RunState};
pub use state::{Entity, EntityKind, Field, GamePhase, GameState, Lane};
pub use tick::{TickInput, TickReport, tick};

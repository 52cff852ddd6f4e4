//! Game events
//!
//! Emitted by the step functions during a tick. The engine turns them into
//! audio cues; hosts may also inspect them for their own effects.

use serde::{Deserialize, Serialize};

use super::state::{EntityKind, Lane};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An accepted lane change
    LaneChanged { from: Lane, to: Lane, perfect: bool },

    NitroActivated,

    /// The boost window ran out and the speed scale was restored
    NitroExpired,

    Spawned { id: u32, lane: Lane, kind: EntityKind },

    /// A gift was taken; `value` is what it added to the pickup count
    PickupCollected { id: u32, value: u32, total: u32 },

    /// Terminal collision with a hazard
    Crashed { id: u32, kind: EntityKind },

    /// Periodic engine note at the current displayed speed
    EngineHum { speed_kmh: u32 },
}

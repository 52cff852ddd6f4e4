//! Entity spawner
//!
//! At most one entity per spawn interval, in a uniformly random lane. Gifts
//! appear twice as often as any single hazard.

use rand::Rng;

use super::state::{EntityKind, GameState, Lane};
use crate::consts::SPAWN_INTERVAL_MS;

/// Kinds drawn uniformly; the duplicate gift doubles its weight
pub const SPAWN_TABLE: [EntityKind; 5] = [
    EntityKind::Coal,
    EntityKind::Ice,
    EntityKind::Elf,
    EntityKind::Gift,
    EntityKind::Gift,
];

/// Pick a lane and kind for the next spawn
pub fn roll(rng: &mut impl Rng) -> (Lane, EntityKind) {
    let lane = Lane::ALL[rng.random_range(0..Lane::ALL.len())];
    let kind = SPAWN_TABLE[rng.random_range(0..SPAWN_TABLE.len())];
    (lane, kind)
}

/// Spawn one entity at the top of the field if the interval has elapsed.
/// Returns the new entity's index in `state.entities`.
pub fn maybe_spawn(state: &mut GameState, now_ms: f64) -> Option<usize> {
    if now_ms - state.last_spawn_ms <= SPAWN_INTERVAL_MS {
        return None;
    }

    let (lane, kind) = roll(&mut state.rng);
    let id = state.add_entity(lane, kind);
    state.last_spawn_ms = now_ms;
    log::trace!("Spawned {:?} #{} in lane {}", kind, id, lane.index());

    Some(state.entities.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SPAWN_Y;
    use crate::sim::state::Field;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state() -> GameState {
        GameState::new(42, Field::new(390.0, 844.0), 100, 0, 0.0)
    }

    #[test]
    fn test_spawns_once_per_interval() {
        let mut state = state();
        assert!(maybe_spawn(&mut state, 1500.0).is_none());
        assert!(maybe_spawn(&mut state, 1501.0).is_some());
        assert!(maybe_spawn(&mut state, 1600.0).is_none());
        assert!(maybe_spawn(&mut state, 3002.0).is_some());
        assert_eq!(state.entities.len(), 2);
    }

    #[test]
    fn test_spawn_lands_at_top_of_its_lane() {
        let mut state = state();
        let index = maybe_spawn(&mut state, 2000.0).unwrap();
        let entity = &state.entities[index];
        assert_eq!(entity.y, SPAWN_Y);
        assert_eq!(entity.x, entity.lane.center_x(state.field.lane_width()));
        assert!(!entity.collected);
    }

    #[test]
    fn test_gifts_weighted_double() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut gifts = 0;
        let mut coal = 0;
        let mut lanes = [0u32; 3];
        for _ in 0..10_000 {
            let (lane, kind) = roll(&mut rng);
            lanes[lane.index() as usize] += 1;
            match kind {
                EntityKind::Gift => gifts += 1,
                EntityKind::Coal => coal += 1,
                _ => {}
            }
        }
        // Expected 4000 gifts vs 2000 coal
        assert!((3700..4300).contains(&gifts));
        assert!((1750..2250).contains(&coal));
        assert!(lanes.iter().all(|&n| (3000..3700).contains(&n)));
    }
}

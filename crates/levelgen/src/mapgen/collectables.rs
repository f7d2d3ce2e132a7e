//! One collectable per floor, scattered inside the floor's footprint.

use slotmap::SlotMap;

use crate::rng::RandomSource;
use crate::types::FloorId;

use super::model::{CollectableSpawn, Floor};

const SPAWN_HALF_EXTENT: f32 = 0.45;
const ORIGIN_CLEAR_RADIUS: f32 = 0.05;
const ORIGIN_PUSH_RADIUS: f32 = 0.1;

pub(super) fn spawn_collectables<R: RandomSource>(
    floors: &SlotMap<FloorId, Floor>,
    order: &[FloorId],
    rng: &mut R,
) -> Vec<CollectableSpawn> {
    let mut spawns = Vec::with_capacity(order.len());
    for floor in order.iter().filter_map(|id| floors.get(*id)) {
        let x = -SPAWN_HALF_EXTENT + 2.0 * SPAWN_HALF_EXTENT * rng.next_real() as f32;
        let y = -SPAWN_HALF_EXTENT + 2.0 * SPAWN_HALF_EXTENT * rng.next_real() as f32;
        let mut offset = (x, y);

        // Keep the player's starting point clear.
        if floor.coord.is_origin() {
            offset = push_out_of_centre(offset);
        }

        spawns.push(CollectableSpawn { floor: floor.id, kind: floor.collectable(), offset });
    }
    spawns
}

fn push_out_of_centre((x, y): (f32, f32)) -> (f32, f32) {
    let magnitude = x.hypot(y);
    if magnitude >= ORIGIN_CLEAR_RADIUS {
        return (x, y);
    }
    if magnitude == 0.0 {
        return (ORIGIN_PUSH_RADIUS, 0.0);
    }
    (x / magnitude * ORIGIN_PUSH_RADIUS, y / magnitude * ORIGIN_PUSH_RADIUS)
}

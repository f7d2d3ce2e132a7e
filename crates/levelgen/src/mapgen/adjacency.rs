//! Derives walls, gates, and boundary sensors from finished grid occupancy.
//!
//! Both floors sharing a boundary emit that boundary's pieces, so every piece
//! goes through a registry that drops a second component of the same kind at
//! the same resolved placement.

use std::collections::BTreeSet;

use log::debug;
use slotmap::SlotMap;

use crate::error::GenerationError;
use crate::types::{BoundaryPos, Direction, FloorId, GridCoord};

use super::grid::GridMatrix;
use super::model::{
    BoundarySensor, Floor, Gate, GateState, PLACEMENT_UNITS_PER_FLOOR, Placement, Wall,
    WallVariant,
};

const HALF_FLOOR: i32 = PLACEMENT_UNITS_PER_FLOOR / 2;
/// Lateral offset of each half wall from the boundary midpoint.
const HALF_WALL_OFFSET: i32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum ComponentKind {
    Wall,
    Gate,
    Sensor,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Boundary pieces of a finished level, each listed once.
pub struct Boundaries {
    pub walls: Vec<Wall>,
    pub gates: Vec<Gate>,
    pub sensors: Vec<BoundarySensor>,
}

/// Collects boundary pieces, keeping only the first of each (kind, placement).
#[derive(Default)]
struct ComponentRegistry {
    seen: BTreeSet<(ComponentKind, Placement)>,
    boundaries: Boundaries,
}

impl ComponentRegistry {
    fn claim(&mut self, kind: ComponentKind, placement: Placement) -> bool {
        self.seen.insert((kind, placement))
    }

    fn add_wall(&mut self, wall: Wall) {
        if self.claim(ComponentKind::Wall, wall.placement) {
            self.boundaries.walls.push(wall);
        }
    }

    fn add_gate(&mut self, gate: Gate) {
        if self.claim(ComponentKind::Gate, gate.placement) {
            self.boundaries.gates.push(gate);
        }
    }

    fn add_sensor(&mut self, sensor: BoundarySensor) {
        if self.claim(ComponentKind::Sensor, sensor.placement) {
            self.boundaries.sensors.push(sensor);
        }
    }
}

fn midpoint(coord: GridCoord, direction: Direction) -> Placement {
    let (dx, dy) = direction.delta();
    Placement {
        x: coord.x * PLACEMENT_UNITS_PER_FLOOR + dx * HALF_FLOOR,
        y: coord.y * PLACEMENT_UNITS_PER_FLOOR + dy * HALF_FLOOR,
    }
}

/// Half-wall placements as seen from `coord`: (right, left).
fn half_wall_placements(coord: GridCoord, direction: Direction) -> (Placement, Placement) {
    let mid = midpoint(coord, direction);
    let (dx, dy) = direction.delta();
    let (px, py) = (dy * HALF_WALL_OFFSET, dx * HALF_WALL_OFFSET);
    (Placement { x: mid.x + px, y: mid.y + py }, Placement { x: mid.x - px, y: mid.y - py })
}

/// Writes each floor's neighbour flags and emits the deduplicated boundary pieces.
///
/// Floors are visited in `order`, and each checks its four edges:
/// - an edge shared with another floor gets a right half wall, a left half
///   wall, a gate and a boundary sensor;
/// - an open edge gets one full wall.
///
/// The floor on the other side of a shared edge emits the same pieces, and the
/// registry keeps only the first. Gates come back `Unassigned` with their
/// floors ordered lower coordinate first.
pub fn resolve_adjacency(
    grid: &GridMatrix,
    floors: &mut SlotMap<FloorId, Floor>,
    order: &[FloorId],
) -> Result<Boundaries, GenerationError> {
    let mut registry = ComponentRegistry::default();

    for &id in order {
        let Some(floor) = floors.get_mut(id) else {
            continue;
        };
        let coord = floor.coord;

        for direction in Direction::CARDINALS {
            let neighbor = if grid.has_neighbor(coord, direction) {
                grid.get(coord.step(direction))?
            } else {
                None
            };
            floor.neighbors.set(direction, neighbor.is_some());

            let boundary = BoundaryPos::between(coord, direction);
            let orientation = boundary.orientation();
            match neighbor {
                Some(other) => {
                    let floor_pair = match direction {
                        Direction::Up | Direction::Right => [id, other],
                        Direction::Down | Direction::Left => [other, id],
                    };
                    let (right, left) = half_wall_placements(coord, direction);
                    registry.add_wall(Wall {
                        boundary,
                        variant: WallVariant::RightHalf,
                        orientation,
                        placement: right,
                    });
                    registry.add_wall(Wall {
                        boundary,
                        variant: WallVariant::LeftHalf,
                        orientation,
                        placement: left,
                    });
                    registry.add_gate(Gate {
                        boundary,
                        orientation,
                        placement: midpoint(coord, direction),
                        floors: floor_pair,
                        state: GateState::Unassigned,
                    });
                    registry.add_sensor(BoundarySensor {
                        boundary,
                        orientation,
                        placement: midpoint(coord, direction),
                        floors: floor_pair,
                    });
                }
                None => registry.add_wall(Wall {
                    boundary,
                    variant: WallVariant::Full,
                    orientation,
                    placement: midpoint(coord, direction),
                }),
            }
        }
    }

    let boundaries = registry.boundaries;
    debug!(
        "resolved {} walls, {} gates, {} sensors",
        boundaries.walls.len(),
        boundaries.gates.len(),
        boundaries.sensors.len()
    );
    Ok(boundaries)
}

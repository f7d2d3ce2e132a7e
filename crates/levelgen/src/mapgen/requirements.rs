//! Frontier expansion that hands every gate a requirement the player can already meet.
//!
//! Starting from the origin floor, a random frontier gate is assigned a
//! requirement drawn only from collectable types found so far, then the floor
//! it leads to is discovered and its gates join the frontier.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, trace};
use slotmap::SlotMap;

use crate::inventory::Inventory;
use crate::rng::RandomSource;
use crate::types::{BoundaryPos, CollectableType, Direction, FloorId};

use super::model::{Floor, Gate, GateId, GateState};

pub struct GateRequirementAssigner<'a> {
    floors: &'a SlotMap<FloorId, Floor>,
    gates: &'a mut [Gate],
    gates_by_boundary: BTreeMap<BoundaryPos, GateId>,
    probability: f64,
    discovered_floors: BTreeSet<FloorId>,
    discovered_types: BTreeSet<CollectableType>,
    frontier: Vec<GateId>,
    /// Gates that are on the frontier or already assigned.
    queued: BTreeSet<GateId>,
    order: Vec<GateId>,
}

impl<'a> GateRequirementAssigner<'a> {
    /// Prepares an assigner over `gates`, which must be the gates resolved for
    /// `floors`.
    ///
    /// `probability` is the chance that each discovered collectable type is added
    /// to a gate requirement. It is expected to be in `0.0..=1.0`, which
    /// `LevelConfig::validate` guarantees for generated levels.
    pub fn new(
        floors: &'a SlotMap<FloorId, Floor>,
        gates: &'a mut [Gate],
        probability: f64,
    ) -> Self {
        let gates_by_boundary =
            gates.iter().enumerate().map(|(index, gate)| (gate.boundary, GateId(index))).collect();
        Self {
            floors,
            gates,
            gates_by_boundary,
            probability,
            discovered_floors: BTreeSet::new(),
            discovered_types: BTreeSet::new(),
            frontier: Vec::new(),
            queued: BTreeSet::new(),
            order: Vec::new(),
        }
    }

    /// Runs the expansion to completion and returns gates in assignment order.
    pub fn assign<R: RandomSource>(mut self, origin: FloorId, rng: &mut R) -> Vec<GateId> {
        self.discover(origin);

        while !self.frontier.is_empty() {
            let gate_id = self.frontier.remove(rng.next_int(0, self.frontier.len()));

            let mut requirement = Inventory::new();
            for &kind in &self.discovered_types {
                if rng.next_real() < self.probability {
                    requirement.add_item(kind);
                }
            }
            trace!("gate {} requires {requirement}", gate_id.0);

            let gate = &mut self.gates[gate_id.0];
            gate.state = GateState::Assigned(requirement);
            let new_floor =
                gate.floors.into_iter().find(|floor| !self.discovered_floors.contains(floor));
            self.order.push(gate_id);

            if let Some(floor) = new_floor {
                self.discover(floor);
            }
        }

        debug!(
            "assigned {} gates across {} floors",
            self.order.len(),
            self.discovered_floors.len()
        );
        self.order
    }

    fn discover(&mut self, floor_id: FloorId) {
        let Some(floor) = self.floors.get(floor_id) else {
            return;
        };
        self.discovered_floors.insert(floor_id);
        self.discovered_types.insert(floor.collectable());

        for direction in Direction::CARDINALS {
            let boundary = BoundaryPos::between(floor.coord, direction);
            if let Some(&gate_id) = self.gates_by_boundary.get(&boundary)
                && self.queued.insert(gate_id)
            {
                self.frontier.push(gate_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BallotDraw;
    use crate::mapgen::adjacency::resolve_adjacency;
    use crate::mapgen::grid::GridMatrix;
    use crate::mapgen::placement::FloorPlacementGenerator;
    use crate::rng::LevelRng;
    use crate::rng::scripted::ScriptedRng;
    use crate::types::{GridCoord, Theme};

    struct Fixture {
        floors: SlotMap<FloorId, Floor>,
        order: Vec<FloorId>,
        gates: Vec<Gate>,
    }

    fn generated(count: usize, seed: u64) -> Fixture {
        let mut rng = LevelRng::from_seed(seed);
        let mut placed =
            FloorPlacementGenerator::new(BallotDraw::Uniform).place_all(count, &mut rng).unwrap();
        let boundaries =
            resolve_adjacency(&placed.grid, &mut placed.floors, &placed.order).unwrap();
        Fixture { floors: placed.floors, order: placed.order, gates: boundaries.gates }
    }

    /// Replays the assignment order and checks each requirement against what was known then.
    fn requirements_respect_discovery(fixture: &Fixture, assigned: &[GateId]) -> bool {
        let origin = fixture.order[0];
        let mut floors = BTreeSet::from([origin]);
        let mut types = BTreeSet::from([fixture.floors[origin].collectable()]);
        for gate_id in assigned {
            let gate = &fixture.gates[gate_id.0];
            let Some(requirement) = gate.requirement() else {
                return false;
            };
            if !requirement.types_required().iter().all(|kind| types.contains(kind)) {
                return false;
            }
            if gate.floors.iter().all(|floor| !floors.contains(floor)) {
                return false;
            }
            for floor in gate.floors {
                if floors.insert(floor) {
                    types.insert(fixture.floors[floor].collectable());
                }
            }
        }
        true
    }

    #[test]
    fn every_gate_is_assigned_exactly_once() {
        for seed in 0..40 {
            let mut fixture = generated(12, seed);
            let origin = fixture.order[0];
            let assigned = GateRequirementAssigner::new(&fixture.floors, &mut fixture.gates, 0.5)
                .assign(origin, &mut LevelRng::from_seed(seed));

            let unique: BTreeSet<_> = assigned.iter().copied().collect();
            assert_eq!(unique.len(), fixture.gates.len(), "seed={seed}");
            assert_eq!(assigned.len(), fixture.gates.len(), "seed={seed}");
            assert!(fixture.gates.iter().all(|gate| matches!(gate.state, GateState::Assigned(_))));
            assert!(requirements_respect_discovery(&fixture, &assigned), "seed={seed}");
        }
    }

    #[test]
    fn zero_probability_leaves_every_gate_free() {
        let mut fixture = generated(15, 3);
        let origin = fixture.order[0];
        GateRequirementAssigner::new(&fixture.floors, &mut fixture.gates, 0.0)
            .assign(origin, &mut LevelRng::from_seed(3));
        assert!(
            fixture.gates.iter().all(|gate| gate.requirement().is_some_and(Inventory::is_empty))
        );
    }

    #[test]
    fn certain_probability_requires_every_discovered_type_once() {
        let mut fixture = generated(15, 8);
        let origin = fixture.order[0];
        let assigned = GateRequirementAssigner::new(&fixture.floors, &mut fixture.gates, 1.0)
            .assign(origin, &mut LevelRng::from_seed(8));

        let mut floors = BTreeSet::from([origin]);
        let mut types = BTreeSet::from([fixture.floors[origin].collectable()]);
        for gate_id in &assigned {
            let gate = &fixture.gates[gate_id.0];
            let requirement = gate.requirement().unwrap();
            assert_eq!(requirement.types_required(), types.iter().copied().collect::<Vec<_>>());
            assert!(requirement.iter().all(|(_, count)| count <= 1));
            for floor in gate.floors {
                if floors.insert(floor) {
                    types.insert(fixture.floors[floor].collectable());
                }
            }
        }
    }

    #[test]
    fn shortcut_gate_still_draws_from_known_types() {
        // Square of four floors: the last gate reached joins two discovered floors.
        let mut floors: SlotMap<FloorId, Floor> = SlotMap::with_key();
        let mut grid = GridMatrix::new();
        let mut order = Vec::new();
        let layout = [
            (GridCoord::ORIGIN, Theme::Desert),
            (GridCoord::new(1, 0), Theme::Ocean),
            (GridCoord::new(1, 1), Theme::Desert),
            (GridCoord::new(0, 1), Theme::Ocean),
        ];
        for (coord, theme) in layout {
            let id = floors.insert_with_key(|id| Floor {
                id,
                coord,
                theme,
                neighbors: Default::default(),
            });
            grid.set(coord, id).unwrap();
            order.push(id);
        }
        let mut gates = resolve_adjacency(&grid, &mut floors, &order).unwrap().gates;
        assert_eq!(gates.len(), 4);

        let mut rng = ScriptedRng::new(&[0, 0, 0, 0], &[0.0; 16]);
        let assigned =
            GateRequirementAssigner::new(&floors, &mut gates, 1.0).assign(order[0], &mut rng);
        assert_eq!(assigned.len(), 4);

        let last = &gates[assigned[3].0];
        let requirement = last.requirement().unwrap();
        assert_eq!(
            requirement.types_required(),
            vec![CollectableType::Diamond, CollectableType::Seashell]
        );
    }
}

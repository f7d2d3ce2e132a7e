//! Public data models for a finished level: floors, walls, gates, sensors, and collectables.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use xxhash_rust::xxh3::xxh3_64;

use crate::config::{BallotDraw, LevelConfig};
use crate::error::GateError;
use crate::inventory::Inventory;
use crate::types::{
    BoundaryPos, CollectableType, Direction, FLOOR_SIZE, FloorId, GridCoord, Orientation, Theme,
};

/// Sub-floor resolution used to place boundary pieces: one floor spans 10 units.
pub const PLACEMENT_UNITS_PER_FLOOR: i32 = 10;

/// Resolved centre of a level component, in tenths of a floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
}

impl Placement {
    pub fn world_position(self) -> (f32, f32) {
        let scale = FLOOR_SIZE / PLACEMENT_UNITS_PER_FLOOR as f32;
        (self.x as f32 * scale, self.y as f32 * scale)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighbors {
    present: [bool; 4],
}

impl Neighbors {
    pub fn has(&self, direction: Direction) -> bool {
        self.present[direction.index()]
    }

    pub fn set(&mut self, direction: Direction, present: bool) {
        self.present[direction.index()] = present;
    }

    pub fn count(&self) -> usize {
        self.present.iter().filter(|&&present| present).count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Floor {
    pub id: FloorId,
    pub coord: GridCoord,
    pub theme: Theme,
    pub neighbors: Neighbors,
}

impl Floor {
    pub fn collectable(&self) -> CollectableType {
        self.theme.collectable()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WallVariant {
    Full,
    LeftHalf,
    RightHalf,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    pub boundary: BoundaryPos,
    pub variant: WallVariant,
    pub orientation: Orientation,
    pub placement: Placement,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateState {
    Unassigned,
    Assigned(Inventory),
    Opened(Inventory),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GateId(pub usize);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub boundary: BoundaryPos,
    pub orientation: Orientation,
    pub placement: Placement,
    /// Floors on either side, lower grid coordinate first.
    pub floors: [FloorId; 2],
    pub state: GateState,
}

impl Gate {
    /// `None` until the requirement assigner reaches this gate.
    pub fn requirement(&self) -> Option<&Inventory> {
        match &self.state {
            GateState::Unassigned => None,
            GateState::Assigned(requirement) | GateState::Opened(requirement) => Some(requirement),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, GateState::Opened(_))
    }

    pub fn other_side(&self, floor: FloorId) -> Option<FloorId> {
        match self.floors {
            [a, b] if a == floor => Some(b),
            [a, b] if b == floor => Some(a),
            _ => None,
        }
    }

    pub fn is_satisfied_by(&self, inventory: &Inventory) -> bool {
        match &self.state {
            GateState::Assigned(requirement) => requirement.is_sub_inventory(inventory),
            GateState::Unassigned | GateState::Opened(_) => false,
        }
    }

    /// Pays the requirement out of `inventory` and opens the gate.
    pub fn open(&mut self, inventory: &mut Inventory) -> Result<Inventory, GateError> {
        let requirement = match &self.state {
            GateState::Unassigned => return Err(GateError::Unassigned),
            GateState::Opened(_) => return Err(GateError::AlreadyOpen),
            GateState::Assigned(requirement) => *requirement,
        };
        if !requirement.is_sub_inventory(inventory) {
            return Err(GateError::Unsatisfied);
        }
        *inventory = *inventory - requirement;
        self.state = GateState::Opened(requirement);
        Ok(requirement)
    }
}

/// Detects the player crossing a gated boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundarySensor {
    pub boundary: BoundaryPos,
    pub orientation: Orientation,
    pub placement: Placement,
    pub floors: [FloorId; 2],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollectableSpawn {
    pub floor: FloorId,
    pub kind: CollectableType,
    /// Offset from the floor centre as a fraction of the floor size.
    pub offset: (f32, f32),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Level {
    pub config: LevelConfig,
    pub floors: SlotMap<FloorId, Floor>,
    /// Floors in the order they were placed; the origin is always first.
    pub placement_order: Vec<FloorId>,
    pub walls: Vec<Wall>,
    pub gates: Vec<Gate>,
    pub sensors: Vec<BoundarySensor>,
    pub collectables: Vec<CollectableSpawn>,
    /// Gates in the order the requirement assigner reached them.
    pub assignment_order: Vec<GateId>,
}

impl Level {
    /// The floor placed first, always at [`GridCoord::ORIGIN`].
    ///
    /// Generated levels and levels accepted by `load_level` always have one;
    /// a `Level` assembled by hand with an empty `placement_order` panics here.
    pub fn origin(&self) -> FloorId {
        self.placement_order[0]
    }

    pub fn floor(&self, id: FloorId) -> Option<&Floor> {
        self.floors.get(id)
    }

    /// Linear scan; levels hold at most 25 floors.
    pub fn floor_at(&self, coord: GridCoord) -> Option<&Floor> {
        self.floors.values().find(|floor| floor.coord == coord)
    }

    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(id.0)
    }

    pub fn gate_at(&self, boundary: BoundaryPos) -> Option<GateId> {
        self.gates.iter().position(|gate| gate.boundary == boundary).map(GateId)
    }

    pub fn floors_in_order(&self) -> impl Iterator<Item = &Floor> + '_ {
        self.placement_order.iter().filter_map(|id| self.floors.get(*id))
    }

    /// Stable little-endian encoding of everything generation decides.
    ///
    /// Floors are encoded in placement order, so slot-map key values never leak in.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.config.floor_count as u32).to_le_bytes());
        bytes.extend(self.config.seed.to_le_bytes());
        bytes.extend(self.config.requirement_probability.to_le_bytes());
        bytes.push(match self.config.ballot_draw {
            BallotDraw::Uniform => 0,
            BallotDraw::ExcludeLast => 1,
        });

        bytes.extend((self.placement_order.len() as u32).to_le_bytes());
        for floor in self.floors_in_order() {
            bytes.extend(floor.coord.x.to_le_bytes());
            bytes.extend(floor.coord.y.to_le_bytes());
            bytes.push(floor.theme as u8);
            for direction in Direction::CARDINALS {
                bytes.push(u8::from(floor.neighbors.has(direction)));
            }
        }

        bytes.extend((self.walls.len() as u32).to_le_bytes());
        for wall in &self.walls {
            bytes.extend(wall.placement.x.to_le_bytes());
            bytes.extend(wall.placement.y.to_le_bytes());
            bytes.push(wall.variant as u8);
        }

        bytes.extend((self.gates.len() as u32).to_le_bytes());
        for gate in &self.gates {
            bytes.extend(gate.boundary.x2.to_le_bytes());
            bytes.extend(gate.boundary.y2.to_le_bytes());
            bytes.push(match gate.state {
                GateState::Unassigned => 0,
                GateState::Assigned(_) => 1,
                GateState::Opened(_) => 2,
            });
            if let Some(requirement) = gate.requirement() {
                for (_, count) in requirement.iter() {
                    bytes.extend(count.to_le_bytes());
                }
            }
        }

        bytes.extend((self.sensors.len() as u32).to_le_bytes());
        for sensor in &self.sensors {
            bytes.extend(sensor.placement.x.to_le_bytes());
            bytes.extend(sensor.placement.y.to_le_bytes());
        }

        bytes.extend((self.collectables.len() as u32).to_le_bytes());
        for spawn in &self.collectables {
            bytes.push(spawn.kind as u8);
            bytes.extend(spawn.offset.0.to_le_bytes());
            bytes.extend(spawn.offset.1.to_le_bytes());
        }

        for gate in &self.assignment_order {
            bytes.extend((gate.0 as u32).to_le_bytes());
        }

        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

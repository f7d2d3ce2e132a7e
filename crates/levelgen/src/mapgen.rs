//! Procedural level generation split into coherent submodules.

pub mod model;
pub mod progression;

mod adjacency;
mod collectables;
mod generator;
mod grid;
mod placement;
mod requirements;

pub use adjacency::{Boundaries, resolve_adjacency};
pub use generator::LevelGenerator;
pub use grid::GridMatrix;
pub use model::{
    BoundarySensor, CollectableSpawn, Floor, Gate, GateId, GateState, Level, Neighbors,
    Placement, Wall, WallVariant,
};
pub use placement::{FloorPlacementGenerator, PlacedFloors};
pub use progression::{ProgressionReport, check_progression};
pub use requirements::GateRequirementAssigner;

use crate::config::LevelConfig;
use crate::error::GenerationError;

pub fn generate_level(config: LevelConfig) -> Result<Level, GenerationError> {
    LevelGenerator::new(config).generate()
}

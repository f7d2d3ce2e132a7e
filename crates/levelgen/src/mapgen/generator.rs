//! High-level level generation orchestration: placement, adjacency, requirements, collectables.

use log::debug;

use crate::config::{GenerationContext, LevelConfig};
use crate::error::GenerationError;
use crate::rng::{LevelRng, RandomSource};

use super::adjacency::resolve_adjacency;
use super::collectables::spawn_collectables;
use super::model::Level;
use super::placement::FloorPlacementGenerator;
use super::requirements::GateRequirementAssigner;

/// Runs placement, adjacency, requirement assignment and collectable spawning
/// over one [`GenerationContext`].
pub struct LevelGenerator<R: RandomSource = LevelRng> {
    context: GenerationContext<R>,
}

impl LevelGenerator<LevelRng> {
    /// Generator seeded from `config.seed` through [`LevelRng`].
    pub fn new(config: LevelConfig) -> Self {
        Self { context: GenerationContext::from_config(config) }
    }
}

impl<R: RandomSource> LevelGenerator<R> {
    /// Generator drawing from a caller-supplied random source.
    pub fn with_context(context: GenerationContext<R>) -> Self {
        Self { context }
    }

    /// Runs one full generation pass. The grid is dropped once walls and gates are known.
    pub fn generate(mut self) -> Result<Level, GenerationError> {
        let config = self.context.config.clone();
        config.validate()?;
        let rng = &mut self.context.rng;
        debug!(
            "generating level: {} floors, seed {}, p={}",
            config.floor_count, config.seed, config.requirement_probability
        );

        let mut placed =
            FloorPlacementGenerator::new(config.ballot_draw).place_all(config.floor_count, rng)?;
        let mut boundaries = resolve_adjacency(&placed.grid, &mut placed.floors, &placed.order)?;

        let origin = placed.order[0];
        let assignment_order = GateRequirementAssigner::new(
            &placed.floors,
            &mut boundaries.gates,
            config.requirement_probability,
        )
        .assign(origin, rng);

        let collectables = spawn_collectables(&placed.floors, &placed.order, rng);

        Ok(Level {
            config,
            floors: placed.floors,
            placement_order: placed.order,
            walls: boundaries.walls,
            gates: boundaries.gates,
            sensors: boundaries.sensors,
            collectables,
            assignment_order,
        })
    }
}

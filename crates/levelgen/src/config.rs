//! Level generation settings and the explicit context threaded through each stage.

use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::rng::{LevelRng, RandomSource};
use crate::types::GRID_CELLS;

/// How the placement ballot turns a random draw into a ballot index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallotDraw {
    /// Every ballot entry can be drawn.
    #[default]
    Uniform,
    /// Draws from `[0, len - 1)`, so the final entry is only reachable once it is alone.
    ExcludeLast,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub floor_count: usize,
    pub seed: u64,
    /// Chance that each discovered collectable type is added to a gate requirement.
    pub requirement_probability: f64,
    pub ballot_draw: BallotDraw,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            floor_count: 10,
            seed: 0,
            requirement_probability: 0.5,
            ballot_draw: BallotDraw::Uniform,
        }
    }
}

impl LevelConfig {
    pub fn new(floor_count: usize, seed: u64) -> Self {
        Self { floor_count, seed, ..Self::default() }
    }

    pub fn with_requirement_probability(mut self, probability: f64) -> Self {
        self.requirement_probability = probability;
        self
    }

    pub fn with_ballot_draw(mut self, ballot_draw: BallotDraw) -> Self {
        self.ballot_draw = ballot_draw;
        self
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.floor_count == 0 || self.floor_count > GRID_CELLS {
            return Err(GenerationError::FloorCountOutOfRange { requested: self.floor_count });
        }
        if !(0.0..=1.0).contains(&self.requirement_probability) {
            return Err(GenerationError::InvalidProbability(self.requirement_probability));
        }
        Ok(())
    }
}

/// Everything a generation pass reads from: settings plus the random stream.
pub struct GenerationContext<R: RandomSource = LevelRng> {
    pub config: LevelConfig,
    pub rng: R,
}

impl GenerationContext<LevelRng> {
    pub fn from_config(config: LevelConfig) -> Self {
        let rng = LevelRng::from_seed(config.seed);
        Self { config, rng }
    }
}

impl<R: RandomSource> GenerationContext<R> {
    pub fn with_rng(config: LevelConfig, rng: R) -> Self {
        Self { config, rng }
    }
}

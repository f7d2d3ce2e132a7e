pub mod config;
pub mod error;
pub mod inventory;
pub mod level_file;
pub mod mapgen;
pub mod rng;
pub mod types;

pub use config::{BallotDraw, GenerationContext, LevelConfig};
pub use error::{BoundsError, GateError, GenerationError};
pub use inventory::Inventory;
pub use level_file::{LevelFileError, check_structure, load_level, save_level};
pub use mapgen::{Level, LevelGenerator, ProgressionReport, check_progression, generate_level};
pub use rng::{LevelRng, RandomSource};
pub use types::*;

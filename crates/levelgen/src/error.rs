//! Error types for grid access, level generation, and gate handling.

use thiserror::Error;

use crate::types::{GRID_CELLS, GridCoord};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("grid coordinate ({}, {}) is outside the floor grid", .coord.x, .coord.y)]
pub struct BoundsError {
    pub coord: GridCoord,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error("floor count {requested} is outside 1..={GRID_CELLS}")]
    FloorCountOutOfRange { requested: usize },

    #[error("requirement probability {0} is outside 0.0..=1.0")]
    InvalidProbability(f64),

    /// Every ballot candidate was rejected before one could be placed.
    #[error("ballot exhausted while placing floor {placed} of {requested}")]
    BallotExhausted { placed: usize, requested: usize },

    #[error(transparent)]
    Bounds(#[from] BoundsError),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    #[error("gate has no requirement assigned yet")]
    Unassigned,

    #[error("gate is already open")]
    AlreadyOpen,

    #[error("inventory does not cover the gate requirement")]
    Unsatisfied,
}

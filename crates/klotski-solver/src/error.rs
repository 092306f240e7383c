//! Errors raised while loading and validating puzzle configurations.
//!
//! The search itself never fails: exhaustion and limits are reported as
//! ordinary outcomes by the solver.

use std::io;

#[derive(thiserror::Error, Debug)]
pub enum PuzzleError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed puzzle json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid piece label {0:?}")]
    InvalidLabel(String),
    #[error("invalid piece kind {0:?}")]
    InvalidKind(String),
    #[error("grid is empty")]
    EmptyGrid,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("grid of {rows}x{cols} exceeds the supported size")]
    TooLarge { rows: usize, cols: usize },
    #[error("piece {0} does not form a solid rectangle")]
    NotRectangular(String),
    #[error("expected 2 hole cells, found {0}")]
    HoleCount(usize),
    #[error("hole {0} must occupy a single cell")]
    HoleShape(String),
    #[error("goal has no cells")]
    EmptyGoal,
    #[error("goal cell ({row}, {col}) is outside the grid")]
    GoalOutOfBounds { row: usize, col: usize },
    #[error("goal kind cannot be the hole kind")]
    HoleGoal,
    #[error("unknown built-in puzzle {0:?}")]
    UnknownBuiltin(String),
}

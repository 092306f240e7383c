//! Breadth-first solver for Klotski-style sliding-block puzzles.
//!
//! A board of rectangular pieces with two unit holes is searched one slide
//! at a time until a target piece covers the goal cells. Layouts that only
//! differ by which same-kind instance sits where are explored once.

pub mod board;
pub mod canonical;
pub mod error;
pub mod goal;
pub mod moves;
pub mod puzzle;
pub mod solver;

// Re-export main types
pub use board::{Board, Cell, PieceId, PieceKind, PieceLocations};
pub use canonical::{baseform, CanonicalBoard};
pub use error::PuzzleError;
pub use goal::Goal;
pub use moves::{apply_move, apply_move_from, successors, Direction, Move};
pub use puzzle::{PuzzleConfig, BUILTIN_NAMES};
pub use solver::{
    compress_moves, solve, CompressionMode, SearchLimit, SearchOutcome, Solution, Solver,
    SolverConfig, SolverResult,
};

//! Puzzle configuration: the start layout and the goal, as static data.
//!
//! Configurations deserialize from JSON such as
//!
//! ```json
//! {
//!   "id": "tiny",
//!   "title": "Tiny",
//!   "grid": [["r", "_1"], ["x1", "_2"]],
//!   "goal": { "kind": "r", "cells": [{ "row": 0, "col": 1 }] }
//! }
//! ```
//!
//! The search assumes a well-formed board, so every shape invariant is
//! checked here, in `PuzzleConfig::build`, before a search starts.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, PieceId, PieceKind, PieceLocations};
use crate::error::PuzzleError;
use crate::goal::Goal;

/// Names accepted by [`PuzzleConfig::builtin`].
pub const BUILTIN_NAMES: &[&str] = &["reference", "classic"];

/// The complete puzzle configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub grid: Vec<Vec<PieceId>>,
    pub goal: Goal,
}

impl PuzzleConfig {
    pub fn from_json(json: &str) -> Result<Self, PuzzleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the configuration and produce the start board and goal.
    pub fn build(&self) -> Result<(Board, Goal), PuzzleError> {
        let board = Board::from_rows(&self.grid)?;
        validate_board(&board)?;
        validate_goal(&board, &self.goal)?;
        Ok((board, self.goal.clone()))
    }

    /// A puzzle shipped with the crate, by name.
    pub fn builtin(name: &str) -> Result<Self, PuzzleError> {
        match name {
            // The red 2x2 block has to reach the middle of the right edge.
            "reference" => from_labels(
                "reference",
                "Red block to the right edge",
                &[
                    "w1 w1 g1 g2 _1",
                    "r  r  w2 w3 w4",
                    "r  r  w2 w3 w4",
                    "w5 w5 g3 g4 _2",
                ],
                'r',
                &[(1, 3), (1, 4), (2, 3), (2, 4)],
            ),
            // Huarong Dao: the 2x2 block has to reach the exit at the bottom.
            "classic" => from_labels(
                "classic",
                "Huarong Dao",
                &[
                    "v1 r  r  v2",
                    "v1 r  r  v2",
                    "v3 h1 h1 v4",
                    "v3 g1 g2 v4",
                    "g3 _1 _2 g4",
                ],
                'r',
                &[(3, 1), (3, 2), (4, 1), (4, 2)],
            ),
            _ => Err(PuzzleError::UnknownBuiltin(name.to_string())),
        }
    }
}

fn from_labels(
    id: &str,
    title: &str,
    rows: &[&str],
    goal_kind: char,
    goal_cells: &[(usize, usize)],
) -> Result<PuzzleConfig, PuzzleError> {
    let grid = rows
        .iter()
        .map(|row| {
            row.split_whitespace()
                .map(PieceId::parse)
                .collect::<Result<Vec<PieceId>, _>>()
        })
        .collect::<Result<Vec<Vec<PieceId>>, _>>()?;
    let kind =
        PieceKind::new(goal_kind).ok_or_else(|| PuzzleError::InvalidKind(goal_kind.to_string()))?;
    let cells = goal_cells
        .iter()
        .map(|&(row, col)| Cell::new(row, col))
        .collect();

    Ok(PuzzleConfig {
        id: id.to_string(),
        title: title.to_string(),
        grid,
        goal: Goal::new(kind, cells),
    })
}

/// Check that every piece covers a solid rectangle and that there are
/// exactly two holes, each a single cell.
pub fn validate_board(board: &Board) -> Result<(), PuzzleError> {
    let holes = board.hole_count();
    if holes != 2 {
        return Err(PuzzleError::HoleCount(holes));
    }

    let locations = PieceLocations::of(board);
    for piece in locations.pieces() {
        let cells = locations.get(piece);

        let (mut top, mut left) = (usize::MAX, usize::MAX);
        let (mut bottom, mut right) = (0, 0);
        for &index in cells {
            let cell = board.cell_at(index);
            top = top.min(cell.row);
            left = left.min(cell.col);
            bottom = bottom.max(cell.row);
            right = right.max(cell.col);
        }

        // Cells are distinct, so filling the bounding box means a rectangle.
        if (bottom - top + 1) * (right - left + 1) != cells.len() {
            return Err(PuzzleError::NotRectangular(piece.to_string()));
        }
        if piece.is_hole() && cells.len() != 1 {
            return Err(PuzzleError::HoleShape(piece.to_string()));
        }
    }

    Ok(())
}

pub fn validate_goal(board: &Board, goal: &Goal) -> Result<(), PuzzleError> {
    if goal.cells.is_empty() {
        return Err(PuzzleError::EmptyGoal);
    }
    if goal.kind.is_hole() {
        return Err(PuzzleError::HoleGoal);
    }
    if let Some(cell) = goal.cells.iter().find(|&&cell| board.get(cell).is_none()) {
        return Err(PuzzleError::GoalOutOfBounds {
            row: cell.row,
            col: cell.col,
        });
    }
    Ok(())
}

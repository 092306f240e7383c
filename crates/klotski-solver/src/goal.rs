//! Win condition: a fixed set of cells that must all hold the target kind.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, PieceKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    /// Kind that must cover every goal cell
    pub kind: PieceKind,
    pub cells: Vec<Cell>,
}

impl Goal {
    pub fn new(kind: PieceKind, cells: Vec<Cell>) -> Self {
        Self { kind, cells }
    }

    /// Checked on the actual board, never on its canonical form. Only the
    /// kind is compared, so instance numbering does not matter.
    pub fn is_satisfied(&self, board: &Board) -> bool {
        self.cells
            .iter()
            .all(|&cell| board.get(cell).is_some_and(|piece| piece.kind == self.kind))
    }
}

//! Canonical board forms used as visited-set keys.
//!
//! Pieces of the same kind are interchangeable, so two layouts that differ
//! only in which instance sits where are the same search state. `baseform`
//! relabels instances in first-occurrence order so all such layouts map to
//! one key. This collapses the reference puzzle's state space from millions
//! of boards to tens of thousands.

use smallvec::SmallVec;

use crate::board::{Board, PieceId, PieceKind};

/// A board whose same-kind instances are numbered in row-major
/// first-occurrence order. Only ever used as a deduplication key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBoard(Board);

impl CanonicalBoard {
    pub fn as_board(&self) -> &Board {
        &self.0
    }

    pub fn into_board(self) -> Board {
        self.0
    }
}

/// Relabel same-kind instances so that, within each kind, the i-th instance
/// met in a row-major scan takes the i-th smallest instance number of that
/// kind.
pub fn baseform(board: &Board) -> CanonicalBoard {
    let mut seen: SmallVec<[PieceId; 16]> = SmallVec::new();
    for &piece in board.cells() {
        if !seen.contains(&piece) {
            seen.push(piece);
        }
    }

    let mut mapping: SmallVec<[(PieceId, PieceId); 16]> = SmallVec::new();
    let mut kinds: SmallVec<[PieceKind; 8]> = SmallVec::new();
    for &first in &seen {
        if kinds.contains(&first.kind) {
            continue;
        }
        kinds.push(first.kind);

        let group: SmallVec<[PieceId; 8]> = seen
            .iter()
            .copied()
            .filter(|piece| piece.kind == first.kind)
            .collect();
        let mut sorted = group.clone();
        sorted.sort_unstable();

        mapping.extend(
            group
                .into_iter()
                .zip(sorted)
                .filter(|(from, to)| from != to),
        );
    }

    if mapping.is_empty() {
        return CanonicalBoard(board.clone());
    }

    CanonicalBoard(board.map_pieces(|piece| {
        mapping
            .iter()
            .find(|(from, _)| *from == piece)
            .map_or(piece, |(_, to)| *to)
    }))
}

//! Board model: piece identities, grid cells and occupancy snapshots.
//!
//! A `Board` is an immutable row-major snapshot mapping every cell to the
//! piece occupying it. Pieces are identified by a one-character kind tag
//! plus an instance number, so `w3` is the third `w` piece and `_1` is the
//! first hole.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::PuzzleError;

/// Cells stored inline before the board spills to the heap.
pub const INLINE_CELLS: usize = 30;

/// Piece category tag - matches the first character of a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PieceKind(u8);

impl PieceKind {
    /// The kind shared by both holes.
    pub const HOLE: PieceKind = PieceKind(b'_');

    /// Any printable ASCII character that is not a digit can tag a kind.
    pub fn new(tag: char) -> Option<Self> {
        if tag.is_ascii_graphic() && !tag.is_ascii_digit() {
            Some(PieceKind(tag as u8))
        } else {
            None
        }
    }

    pub fn tag(self) -> char {
        self.0 as char
    }

    pub fn is_hole(self) -> bool {
        self == Self::HOLE
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl TryFrom<String> for PieceKind {
    type Error = PuzzleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let parsed = {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(tag), None) => PieceKind::new(tag),
                _ => None,
            }
        };
        parsed.ok_or(PuzzleError::InvalidKind(value))
    }
}

impl From<PieceKind> for String {
    fn from(kind: PieceKind) -> Self {
        kind.tag().to_string()
    }
}

/// A piece identity: kind tag plus instance number.
///
/// Instance 0 is written as the bare tag (`r`), any other instance as the
/// tag followed by the number (`w3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PieceId {
    pub kind: PieceKind,
    pub instance: u8,
}

impl PieceId {
    pub const fn new(kind: PieceKind, instance: u8) -> Self {
        Self { kind, instance }
    }

    pub fn is_hole(self) -> bool {
        self.kind.is_hole()
    }

    /// Parse a label such as `r`, `w12` or `_2`.
    pub fn parse(label: &str) -> Result<Self, PuzzleError> {
        let invalid = || PuzzleError::InvalidLabel(label.to_string());

        let mut chars = label.chars();
        let kind = chars.next().and_then(PieceKind::new).ok_or_else(invalid)?;
        let suffix = chars.as_str();

        if suffix.is_empty() {
            return Ok(Self::new(kind, 0));
        }
        if suffix.starts_with('0') || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let instance = suffix.parse::<u8>().map_err(|_| invalid())?;
        Ok(Self::new(kind, instance))
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = if self.instance == 0 {
            self.kind.tag().to_string()
        } else {
            format!("{}{}", self.kind.tag(), self.instance)
        };
        f.pad(&label)
    }
}

impl TryFrom<String> for PieceId {
    type Error = PuzzleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PieceId::parse(&value)
    }
}

impl From<PieceId> for String {
    fn from(piece: PieceId) -> Self {
        piece.to_string()
    }
}

/// Position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Immutable occupancy snapshot of the whole grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: u8,
    cols: u8,
    cells: SmallVec<[PieceId; INLINE_CELLS]>,
}

impl Board {
    /// Largest supported number of rows or columns.
    pub const MAX_SIDE: usize = u8::MAX as usize;

    /// Build a board from rows of piece ids.
    ///
    /// Only the grid shape is checked here; piece shapes and the hole count
    /// are validated by `PuzzleConfig::build`.
    pub fn from_rows(grid: &[Vec<PieceId>]) -> Result<Self, PuzzleError> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, |row| row.len());
        if rows == 0 || cols == 0 {
            return Err(PuzzleError::EmptyGrid);
        }
        if rows > Self::MAX_SIDE || cols > Self::MAX_SIDE {
            return Err(PuzzleError::TooLarge { rows, cols });
        }

        let mut cells = SmallVec::with_capacity(rows * cols);
        for (row, line) in grid.iter().enumerate() {
            if line.len() != cols {
                return Err(PuzzleError::RaggedRow {
                    row,
                    found: line.len(),
                    expected: cols,
                });
            }
            cells.extend_from_slice(line);
        }

        Ok(Self {
            rows: rows as u8,
            cols: cols as u8,
            cells,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    /// Row-major occupants.
    pub fn cells(&self) -> &[PieceId] {
        &self.cells
    }

    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        if cell.row < self.rows() && cell.col < self.cols() {
            Some(cell.row * self.cols() + cell.col)
        } else {
            None
        }
    }

    pub fn cell_at(&self, index: usize) -> Cell {
        Cell::new(index / self.cols(), index % self.cols())
    }

    /// Bounds-checked occupant lookup.
    pub fn get(&self, cell: Cell) -> Option<PieceId> {
        self.index_of(cell).map(|index| self.cells[index])
    }

    /// Occupant of an in-bounds cell.
    ///
    /// Panics if `cell` lies outside the grid.
    pub fn occupant(&self, cell: Cell) -> PieceId {
        self.cells[cell.row * self.cols() + cell.col]
    }

    pub(crate) fn occupant_at(&self, index: usize) -> PieceId {
        self.cells[index]
    }

    pub(crate) fn set(&mut self, index: usize, piece: PieceId) {
        self.cells[index] = piece;
    }

    /// Index of the cell displaced by (`drow`, `dcol`), if it is on the grid.
    pub fn offset(&self, index: usize, drow: i32, dcol: i32) -> Option<usize> {
        let cell = self.cell_at(index);
        let row = cell.row as i32 + drow;
        let col = cell.col as i32 + dcol;
        if row < 0 || col < 0 || row >= self.rows() as i32 || col >= self.cols() as i32 {
            return None;
        }
        Some(row as usize * self.cols() + col as usize)
    }

    /// All cells held by `piece`, in row-major order.
    pub fn locations(&self, piece: PieceId) -> Vec<Cell> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupant)| **occupant == piece)
            .map(|(index, _)| self.cell_at(index))
            .collect()
    }

    pub fn hole_count(&self) -> usize {
        self.cells.iter().filter(|piece| piece.is_hole()).count()
    }

    /// Copy of this board with every occupant rewritten through `f`.
    pub(crate) fn map_pieces(&self, mut f: impl FnMut(PieceId) -> PieceId) -> Board {
        Board {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(|&piece| f(piece)).collect(),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, line) in self.cells.chunks(self.cols()).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for (col, piece) in line.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:<2}", piece)?;
            }
        }
        Ok(())
    }
}

/// Board from whitespace-separated labels, one string per row.
#[cfg(test)]
pub(crate) fn parse_board(rows: &[&str]) -> Board {
    let grid: Vec<Vec<PieceId>> = rows
        .iter()
        .map(|row| {
            row.split_whitespace()
                .map(|label| PieceId::parse(label).unwrap())
                .collect()
        })
        .collect();
    Board::from_rows(&grid).unwrap()
}

/// Cell indices of every piece on one board, gathered in a single scan.
///
/// Built once per expansion and handed to move application so a piece's
/// cells are never searched for twice.
#[derive(Debug, Clone, Default)]
pub struct PieceLocations {
    entries: SmallVec<[(PieceId, SmallVec<[usize; 4]>); 16]>,
}

impl PieceLocations {
    pub fn of(board: &Board) -> Self {
        let mut entries: SmallVec<[(PieceId, SmallVec<[usize; 4]>); 16]> = SmallVec::new();
        for (index, &piece) in board.cells().iter().enumerate() {
            match entries.iter_mut().find(|(id, _)| *id == piece) {
                Some((_, cells)) => cells.push(index),
                None => {
                    let mut cells = SmallVec::new();
                    cells.push(index);
                    entries.push((piece, cells));
                }
            }
        }
        Self { entries }
    }

    /// Cell indices held by `piece` (empty if it is not on the board).
    pub fn get(&self, piece: PieceId) -> &[usize] {
        self.entries
            .iter()
            .find(|(id, _)| *id == piece)
            .map_or(&[] as &[usize], |(_, cells)| cells.as_slice())
    }

    /// Pieces in first-occurrence (row-major) order.
    pub fn pieces(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// Holes by label (`_1` before `_2`), wherever they sit on the grid.
    pub fn holes(&self) -> impl Iterator<Item = (PieceId, &[usize])> + '_ {
        let mut holes: SmallVec<[(PieceId, &[usize]); 2]> = self
            .entries
            .iter()
            .filter(|(id, _)| id.is_hole())
            .map(|(id, cells)| (*id, cells.as_slice()))
            .collect();
        holes.sort_unstable_by_key(|(id, _)| *id);
        holes.into_iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::parse_board as board;

    fn id(label: &str) -> PieceId {
        PieceId::parse(label).unwrap()
    }

    #[test]
    fn test_label_parsing() {
        let w3 = id("w3");
        assert_eq!(w3.kind.tag(), 'w');
        assert_eq!(w3.instance, 3);
        assert_eq!(id("r").instance, 0);
        assert!(id("_2").is_hole());
        assert!(!id("r").is_hole());

        assert!(PieceId::parse("").is_err());
        assert!(PieceId::parse("3w").is_err());
        assert!(PieceId::parse("w0").is_err());
        assert!(PieceId::parse("w01").is_err());
        assert!(PieceId::parse("w+1").is_err());
        assert!(PieceId::parse("w256").is_err());
    }

    #[test]
    fn test_label_display() {
        assert_eq!(id("r").to_string(), "r");
        assert_eq!(id("w12").to_string(), "w12");
        assert_eq!(format!("{:<2}|", id("r")), "r |");
    }

    #[test]
    fn test_label_serde() {
        let piece: PieceId = serde_json::from_str("\"g4\"").unwrap();
        assert_eq!(piece, id("g4"));
        assert_eq!(serde_json::to_string(&piece).unwrap(), "\"g4\"");

        let kind: PieceKind = serde_json::from_str("\"r\"").unwrap();
        assert_eq!(kind.tag(), 'r');
        assert!(serde_json::from_str::<PieceKind>("\"rr\"").is_err());
    }

    #[test]
    fn test_occupancy_queries() {
        let b = board(&["w1 w1 _1", "r  r  _2"]);
        assert_eq!(b.rows(), 2);
        assert_eq!(b.cols(), 3);
        assert_eq!(b.occupant(Cell::new(1, 0)), id("r"));
        assert_eq!(b.get(Cell::new(0, 2)), Some(id("_1")));
        assert_eq!(b.get(Cell::new(2, 0)), None);
        assert_eq!(b.get(Cell::new(0, 3)), None);
        assert_eq!(
            b.locations(id("w1")),
            vec![Cell::new(0, 0), Cell::new(0, 1)]
        );
        assert!(b.locations(id("g1")).is_empty());
        assert_eq!(b.hole_count(), 2);
    }

    #[test]
    fn test_offset_bounds() {
        let b = board(&["a b", "c d"]);
        assert_eq!(b.offset(0, 0, 1), Some(1));
        assert_eq!(b.offset(0, 1, 0), Some(2));
        assert_eq!(b.offset(0, -1, 0), None);
        assert_eq!(b.offset(3, 0, 1), None);
        assert_eq!(b.offset(3, 1, 0), None);
    }

    #[test]
    fn test_from_rows_rejects_bad_grids() {
        assert!(matches!(Board::from_rows(&[]), Err(PuzzleError::EmptyGrid)));

        let ragged = vec![vec![id("a"), id("b")], vec![id("c")]];
        assert!(matches!(
            Board::from_rows(&ragged),
            Err(PuzzleError::RaggedRow {
                row: 1,
                found: 1,
                expected: 2
            })
        ));
    }

    #[test]
    fn test_piece_locations_cache() {
        let b = board(&["w1 w1 g1", "r  _1 _2"]);
        let locations = PieceLocations::of(&b);

        assert_eq!(locations.len(), 5);
        assert_eq!(locations.get(id("w1")), &[0, 1]);
        assert_eq!(locations.get(id("r")), &[3]);
        assert!(locations.get(id("w9")).is_empty());

        let pieces: Vec<PieceId> = locations.pieces().collect();
        assert_eq!(pieces, vec![id("w1"), id("g1"), id("r"), id("_1"), id("_2")]);

        let holes: Vec<(PieceId, Vec<usize>)> = locations
            .holes()
            .map(|(hole, cells)| (hole, cells.to_vec()))
            .collect();
        assert_eq!(holes, vec![(id("_1"), vec![4]), (id("_2"), vec![5])]);
    }

    #[test]
    fn test_holes_in_label_order() {
        let b = board(&["_2 a", "b  _1"]);
        let locations = PieceLocations::of(&b);

        let pieces: Vec<PieceId> = locations.pieces().collect();
        assert_eq!(pieces, vec![id("_2"), id("a"), id("b"), id("_1")]);

        let holes: Vec<PieceId> = locations.holes().map(|(hole, _)| hole).collect();
        assert_eq!(holes, vec![id("_1"), id("_2")]);
    }

    #[test]
    fn test_board_display() {
        let b = board(&["w1 w1 _1", "r  r  _2"]);
        assert_eq!(b.to_string(), "w1 w1 _1\nr  r  _2");
    }
}
